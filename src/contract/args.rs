//! Call arguments and bytes32 string helpers.

use std::fmt;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Address, B256, I256, U256};

use crate::blockchain::types::{ChainError, ChainResult};

/// One positional argument of a contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Address(Address),
    Uint(U256),
    Int(I256),
    Bool(bool),
    Bytes32(B256),
    String(String),
    Array(Vec<CallArg>),
}

impl CallArg {
    /// Coerce into an ABI value of type `ty`.
    ///
    /// Integer widths follow the declared parameter; values that do not fit
    /// are rejected here rather than by the node.
    pub fn to_sol_value(&self, ty: &DynSolType) -> ChainResult<DynSolValue> {
        let value = match (self, ty) {
            (CallArg::Address(a), DynSolType::Address) => DynSolValue::Address(*a),
            (CallArg::Uint(v), DynSolType::Uint(bits)) => {
                if *bits < 256 && v.bit_len() > *bits {
                    return Err(ChainError::Abi(format!("{} does not fit in uint{}", v, bits)));
                }
                DynSolValue::Uint(*v, *bits)
            }
            (CallArg::Int(v), DynSolType::Int(bits)) => {
                if *bits < 256 && v.bits() as usize > *bits {
                    return Err(ChainError::Abi(format!("{} does not fit in int{}", v, bits)));
                }
                DynSolValue::Int(*v, *bits)
            }
            (CallArg::Bool(b), DynSolType::Bool) => DynSolValue::Bool(*b),
            (CallArg::Bytes32(b), DynSolType::FixedBytes(32)) => DynSolValue::FixedBytes(*b, 32),
            (CallArg::String(s), DynSolType::String) => DynSolValue::String(s.clone()),
            (CallArg::Array(items), DynSolType::Array(inner)) => DynSolValue::Array(
                items
                    .iter()
                    .map(|item| item.to_sol_value(inner))
                    .collect::<ChainResult<_>>()?,
            ),
            (CallArg::Array(items), DynSolType::FixedArray(inner, len)) => {
                if items.len() != *len {
                    return Err(ChainError::Abi(format!(
                        "expected {} elements, got {}",
                        len,
                        items.len()
                    )));
                }
                DynSolValue::FixedArray(
                    items
                        .iter()
                        .map(|item| item.to_sol_value(inner))
                        .collect::<ChainResult<_>>()?,
                )
            }
            (arg, ty) => {
                return Err(ChainError::Abi(format!(
                    "argument {} does not match parameter type {}",
                    arg, ty
                )))
            }
        };
        Ok(value)
    }

    /// The address carried by this argument, if any.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            CallArg::Address(a) => Some(*a),
            _ => None,
        }
    }
}

impl fmt::Display for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallArg::Address(a) => write!(f, "{}", a),
            CallArg::Uint(v) => write!(f, "{}", v),
            CallArg::Int(v) => write!(f, "{}", v),
            CallArg::Bool(b) => write!(f, "{}", b),
            CallArg::Bytes32(b) => match parse_bytes32_string(b) {
                Ok(s) if !s.is_empty() => write!(f, "{} ({:?})", b, s),
                _ => write!(f, "{}", b),
            },
            CallArg::String(s) => write!(f, "{:?}", s),
            CallArg::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<Address> for CallArg {
    fn from(a: Address) -> Self {
        CallArg::Address(a)
    }
}

impl From<U256> for CallArg {
    fn from(v: U256) -> Self {
        CallArg::Uint(v)
    }
}

impl From<u64> for CallArg {
    fn from(v: u64) -> Self {
        CallArg::Uint(U256::from(v))
    }
}

impl From<bool> for CallArg {
    fn from(b: bool) -> Self {
        CallArg::Bool(b)
    }
}

impl From<B256> for CallArg {
    fn from(b: B256) -> Self {
        CallArg::Bytes32(b)
    }
}

impl From<&str> for CallArg {
    fn from(s: &str) -> Self {
        CallArg::String(s.to_string())
    }
}

impl From<String> for CallArg {
    fn from(s: String) -> Self {
        CallArg::String(s)
    }
}

/// Encode a short UTF-8 string as a null-terminated bytes32 word.
///
/// At most 31 bytes fit; the last byte is always zero.
pub fn format_bytes32_string(text: &str) -> ChainResult<B256> {
    let bytes = text.as_bytes();
    if bytes.len() > 31 {
        return Err(ChainError::Abi(format!(
            "bytes32 string must be at most 31 bytes, '{}' is {}",
            text,
            bytes.len()
        )));
    }
    let mut word = [0u8; 32];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(B256::from(word))
}

/// Decode a bytes32 word produced by [`format_bytes32_string`].
pub fn parse_bytes32_string(word: &B256) -> ChainResult<String> {
    if word[31] != 0 {
        return Err(ChainError::Abi("invalid bytes32 string: not null-terminated".to_string()));
    }
    let len = word.iter().position(|b| *b == 0).unwrap_or(32);
    String::from_utf8(word[..len].to_vec())
        .map_err(|e| ChainError::Abi(format!("invalid bytes32 string: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes32_proposal_names() {
        let word = format_bytes32_string("Proposal 1").unwrap();
        assert_eq!(&word[..10], b"Proposal 1");
        assert!(word[10..].iter().all(|b| *b == 0));
        assert_eq!(parse_bytes32_string(&word).unwrap(), "Proposal 1");
    }

    #[test]
    fn test_bytes32_too_long() {
        let long = "x".repeat(32);
        assert!(format_bytes32_string(&long).is_err());
        assert!(format_bytes32_string(&long[..31]).is_ok());
    }

    #[test]
    fn test_bytes32_not_terminated() {
        let word = B256::repeat_byte(b'a');
        assert!(parse_bytes32_string(&word).is_err());
    }

    #[test]
    fn test_uint_width_follows_parameter() {
        let value = CallArg::from(7u64).to_sol_value(&DynSolType::Uint(8)).unwrap();
        assert_eq!(value, DynSolValue::Uint(U256::from(7), 8));

        let err = CallArg::from(300u64)
            .to_sol_value(&DynSolType::Uint(8))
            .unwrap_err();
        assert!(err.to_string().contains("uint8"));
    }

    #[test]
    fn test_int_width_follows_parameter() {
        let min = CallArg::Int(I256::try_from(-128i64).unwrap());
        assert!(min.to_sol_value(&DynSolType::Int(8)).is_ok());

        let err = CallArg::Int(I256::try_from(128i64).unwrap())
            .to_sol_value(&DynSolType::Int(8))
            .unwrap_err();
        assert!(err.to_string().contains("int8"));
        assert!(CallArg::Int(I256::try_from(-129i64).unwrap())
            .to_sol_value(&DynSolType::Int(8))
            .is_err());
    }

    #[test]
    fn test_type_mismatch() {
        let err = CallArg::Bool(true)
            .to_sol_value(&DynSolType::Address)
            .unwrap_err();
        assert!(matches!(err, ChainError::Abi(_)));
    }

    #[test]
    fn test_bytes32_array() {
        let names = CallArg::Array(vec![
            format_bytes32_string("A").unwrap().into(),
            format_bytes32_string("B").unwrap().into(),
        ]);
        let ty = DynSolType::Array(Box::new(DynSolType::FixedBytes(32)));
        let value = names.to_sol_value(&ty).unwrap();
        assert!(matches!(value, DynSolValue::Array(ref items) if items.len() == 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(CallArg::from(100u64).to_string(), "100");
        assert_eq!(CallArg::from("hi").to_string(), "\"hi\"");
        assert_eq!(
            CallArg::Array(vec![CallArg::Bool(true), CallArg::Bool(false)]).to_string(),
            "[true, false]"
        );
    }
}
