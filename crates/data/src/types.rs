use std::fmt;

/// Primitive value types. `Bool` occupies 8 bits for layout purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    U8,
    U16,
    U32,
    U256,
    Bool,
}

impl PrimitiveType {
    pub const fn bit_width(self) -> u32 {
        match self {
            PrimitiveType::U8 => 8,
            PrimitiveType::U16 => 16,
            PrimitiveType::U32 => 32,
            PrimitiveType::U256 => 256,
            PrimitiveType::Bool => 8,
        }
    }

    /// Maps a number literal's bit width back to the unsigned type of that
    /// width. Parsed programs only ever carry widths of 8, 16, 32 or 256.
    pub const fn from_bit_width(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(PrimitiveType::U8),
            16 => Some(PrimitiveType::U16),
            32 => Some(PrimitiveType::U32),
            256 => Some(PrimitiveType::U256),
            _ => None,
        }
    }

    /// Resolves a source-level type annotation.
    pub fn from_annotation(name: &str) -> Option<Self> {
        match name {
            "u8" => Some(PrimitiveType::U8),
            "u16" => Some(PrimitiveType::U16),
            "u32" => Some(PrimitiveType::U32),
            "u256" => Some(PrimitiveType::U256),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U256 => "u256",
            PrimitiveType::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Resolved type of a symbol or expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInfo {
    Primitive(PrimitiveType),
    /// Element type and element count.
    Array(Box<TypeInfo>, u32),
}

impl TypeInfo {
    /// Width in bits. Declaration offsets advance by exactly this amount.
    pub fn bit_width(&self) -> u32 {
        match self {
            TypeInfo::Primitive(ty) => ty.bit_width(),
            TypeInfo::Array(element, len) => element.bit_width() * len,
        }
    }
}
