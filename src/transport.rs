use crate::error::TransportError;
use crate::register::Address;

/// Addressed register transfer provided by the fieldbus layer (CANopen SDO
/// client, EtherCAT mailbox, ...).
///
/// Payloads are raw little-endian bytes; `download` receives exactly the wire
/// width of the register's data type.
pub trait Transport {
    fn upload(&mut self, address: Address, subnode: u8) -> Result<Vec<u8>, TransportError>;

    fn download(&mut self, address: Address, subnode: u8, data: &[u8]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn upload(&mut self, address: Address, subnode: u8) -> Result<Vec<u8>, TransportError> {
        (**self).upload(address, subnode)
    }

    fn download(&mut self, address: Address, subnode: u8, data: &[u8]) -> Result<(), TransportError> {
        (**self).download(address, subnode, data)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn upload(&mut self, address: Address, subnode: u8) -> Result<Vec<u8>, TransportError> {
        (**self).upload(address, subnode)
    }

    fn download(&mut self, address: Address, subnode: u8, data: &[u8]) -> Result<(), TransportError> {
        (**self).download(address, subnode, data)
    }
}
