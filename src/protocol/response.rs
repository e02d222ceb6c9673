//! Reply definitions
//!
//! Represents array replies received from the store.

use bytes::Bytes;

/// Element type markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElementType {
    BulkString = b'$',
    Integer = b':',
    Error = b'-',
}

impl ElementType {
    /// Map a marker byte to its element type
    pub fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            b'$' => Some(ElementType::BulkString),
            b':' => Some(ElementType::Integer),
            b'-' => Some(ElementType::Error),
            _ => None,
        }
    }
}

/// One decoded element of an array reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayElement {
    Integer(i64),
    Error(Bytes),
    BulkString(Bytes),
}

impl ArrayElement {
    /// Payload of a bulk string element
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ArrayElement::BulkString(b) => Some(b),
            _ => None,
        }
    }

    /// Bulk string payload decoded as UTF-8 (lossy)
    pub fn to_text(&self) -> Option<String> {
        self.as_bytes()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

/// A fully decoded array reply
///
/// Holds exactly as many elements as the reply header declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayReply {
    elements: Vec<ArrayElement>,
}

impl ArrayReply {
    pub fn new(elements: Vec<ArrayElement>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[ArrayElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArrayElement> {
        self.elements.iter()
    }

    pub fn into_elements(self) -> Vec<ArrayElement> {
        self.elements
    }
}

impl IntoIterator for ArrayReply {
    type Item = ArrayElement;
    type IntoIter = std::vec::IntoIter<ArrayElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
