// Thu Oct 15 2026 - Alex

use crate::config::Config;
use crate::hierarchy::ClassId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Char,
    Short,
    Int,
    Long,
    LongLong,
    Float,
    Double,
    Pointer,
}

impl PrimitiveType {
    pub fn parse(name: &str) -> Option<Self> {
        let ty = match name.trim() {
            "bool" => Self::Bool,
            "char" | "signed char" | "unsigned char" | "int8_t" | "uint8_t" => Self::Char,
            "short" | "unsigned short" | "int16_t" | "uint16_t" => Self::Short,
            "int" | "unsigned" | "unsigned int" | "int32_t" | "uint32_t" => Self::Int,
            "long" | "unsigned long" => Self::Long,
            "long long" | "unsigned long long" | "int64_t" | "uint64_t" => Self::LongLong,
            "float" => Self::Float,
            "double" => Self::Double,
            other if other.ends_with('*') => Self::Pointer,
            _ => return None,
        };
        Some(ty)
    }

    pub fn size(self, config: &Config) -> usize {
        match self {
            Self::Bool | Self::Char => 1,
            Self::Short => 2,
            Self::Int => config.int_size,
            Self::Long => config.long_size,
            Self::LongLong | Self::Double => 8,
            Self::Float => 4,
            Self::Pointer => config.pointer_size,
        }
    }

    pub fn alignment(self, config: &Config) -> usize {
        match self {
            Self::Pointer => config.pointer_alignment,
            other => other.size(config),
        }
    }
}

/// Storage of a data member: an opaque scalar, or an embedded object laid
/// out as a complete instance of its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Scalar { size: usize, align: usize },
    Object(ClassId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMember {
    pub name: String,
    pub kind: MemberKind,
}

impl DataMember {
    pub fn scalar(name: &str, size: usize, align: usize) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Scalar { size, align: align.max(1) },
        }
    }

    pub fn primitive(name: &str, ty: PrimitiveType, config: &Config) -> Self {
        Self::scalar(name, ty.size(config), ty.alignment(config))
    }

    pub fn object(name: &str, class: ClassId) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Object(class),
        }
    }

    pub fn object_class(&self) -> Option<ClassId> {
        match self.kind {
            MemberKind::Object(class) => Some(class),
            MemberKind::Scalar { .. } => None,
        }
    }
}

impl fmt::Display for DataMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MemberKind::Scalar { size, align } => write!(f, "{} [{} bytes, align {}]", self.name, size, align),
            MemberKind::Object(class) => write!(f, "{} [object {}]", self.name, class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_sizes_follow_config() {
        let lp64 = Config::default();
        let ilp32 = Config::ilp32();

        assert_eq!(PrimitiveType::parse("int").unwrap().size(&lp64), 4);
        assert_eq!(PrimitiveType::parse("long").unwrap().size(&lp64), 8);
        assert_eq!(PrimitiveType::parse("long").unwrap().size(&ilp32), 4);
        assert_eq!(PrimitiveType::parse("Foo*").unwrap().size(&ilp32), 4);
        assert!(PrimitiveType::parse("Foo").is_none());
    }
}
