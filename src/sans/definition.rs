//! Definition records and the table of live definitions.

use thiserror::Error;
use zerocopy::FromBytes;

/// Byte order of every multi-byte value described by a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// The fixed portion of a definition record, following its header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionMessage {
    pub byte_order: ByteOrder,
    pub global_message: u16,
    /// Number of field definitions that follow.
    pub field_count: u8,
}

impl DefinitionMessage {
    /// Decode the fixed portion of a definition record.
    ///
    /// The architecture byte selects the byte order of the global message
    /// number as well as of every field described afterward.
    pub fn advance(r: [u8; 5]) -> Self {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct RawDefinitionMessage {
            _reserved: u8,
            architecture: u8,
            global_message: [u8; 2],
            field_count: u8,
        }

        let RawDefinitionMessage {
            architecture,
            global_message,
            field_count,
            ..
        } = zerocopy::transmute!(r);

        let (byte_order, global_message) = if architecture == 0 {
            (ByteOrder::Little, u16::from_le_bytes(global_message))
        } else {
            (ByteOrder::Big, u16::from_be_bytes(global_message))
        };

        Self {
            byte_order,
            global_message,
            field_count,
        }
    }
}

/// Layout of one field within data records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub field: u8,
    /// Size of the field in bytes.
    pub size: u8,
    /// Base type code, decoded by [`crate::sans::data::BaseType::from_code`].
    pub base_type: u8,
}

impl FieldDefinition {
    /// Decode a field definition.
    pub fn advance(r: [u8; 3]) -> Self {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct RawFieldDefinition {
            field: u8,
            size: u8,
            base_type: u8,
        }

        let RawFieldDefinition {
            field,
            size,
            base_type,
        } = zerocopy::transmute!(r);

        Self {
            field,
            size,
            base_type,
        }
    }
}

/// Layout of one developer field within data records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeveloperFieldDefinition {
    pub field: u8,
    pub size: u8,
    pub developer_data_index: u8,
}

impl DeveloperFieldDefinition {
    /// Decode a developer field definition.
    pub fn advance(r: [u8; 3]) -> Self {
        let [field, size, developer_data_index] = r;

        Self {
            field,
            size,
            developer_data_index,
        }
    }
}

/// A complete definition, describing data records for a local message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    pub global_message: u16,
    pub byte_order: ByteOrder,
    pub fields: Vec<FieldDefinition>,
    pub developer_fields: Vec<DeveloperFieldDefinition>,
}

impl MessageDefinition {
    /// Number of bytes in a data record following this definition,
    /// excluding its header byte.
    pub fn data_size(&self) -> usize {
        let standard = self.fields.iter().map(|f| usize::from(f.size));
        let developer = self.developer_fields.iter().map(|f| usize::from(f.size));
        standard.chain(developer).sum()
    }
}

/// A data record referred to a local message with no definition.
#[derive(Debug, Error)]
#[error("No definition for local message {0}.")]
pub struct UndefinedLocalMessage(pub u8);

/// Number of addressable local message slots.
pub const LOCAL_MESSAGES: usize = 16;

/// The live definition of each local message slot.
#[derive(Debug, Default)]
pub struct DefinitionTable {
    slots: [Option<MessageDefinition>; LOCAL_MESSAGES],
}

impl DefinitionTable {
    /// Store a definition for a slot, returning the one it replaces.
    ///
    /// # Panics
    ///
    /// Panics if `local_message` is not below [`LOCAL_MESSAGES`]. Record
    /// headers cannot encode larger slots.
    pub fn define(
        &mut self,
        local_message: u8,
        definition: MessageDefinition,
    ) -> Option<MessageDefinition> {
        self.slots[usize::from(local_message)].replace(definition)
    }

    /// Retrieve the live definition for a slot.
    pub fn lookup(&self, local_message: u8) -> Result<&MessageDefinition, UndefinedLocalMessage> {
        self.slots
            .get(usize::from(local_message))
            .and_then(Option::as_ref)
            .ok_or(UndefinedLocalMessage(local_message))
    }
}
