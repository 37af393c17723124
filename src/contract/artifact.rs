//! Contract artifacts: ABI plus optional creation bytecode.
//!
//! Accepts either a Hardhat artifact (`{ "contractName", "abi", "bytecode" }`)
//! or a bare ABI array.

use std::path::Path;

use alloy::dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy::json_abi::{Function, JsonAbi, StateMutability};
use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::blockchain::types::{ChainError, ChainResult};
use crate::contract::args::CallArg;

#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactFile {
    Hardhat {
        #[serde(rename = "contractName")]
        contract_name: Option<String>,
        abi: JsonAbi,
        #[serde(default)]
        bytecode: Option<String>,
    },
    Abi(JsonAbi),
}

/// Parsed contract interface.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: Option<String>,
    pub abi: JsonAbi,
    /// Creation code, absent for interfaces and bare ABIs.
    pub bytecode: Option<Bytes>,
}

impl ContractArtifact {
    /// Parse an artifact from JSON text.
    pub fn from_json(json: &str) -> ChainResult<Self> {
        let file: ArtifactFile = serde_json::from_str(json)
            .map_err(|e| ChainError::Artifact(format!("Invalid artifact JSON: {}", e)))?;

        match file {
            ArtifactFile::Abi(abi) => Ok(Self {
                contract_name: None,
                abi,
                bytecode: None,
            }),
            ArtifactFile::Hardhat {
                contract_name,
                abi,
                bytecode,
            } => {
                let bytecode = match bytecode.as_deref().map(str::trim) {
                    None | Some("") | Some("0x") => None,
                    Some(hex) => Some(hex.parse::<Bytes>().map_err(|e| {
                        ChainError::Artifact(format!("Invalid bytecode: {}", e))
                    })?),
                };
                Ok(Self {
                    contract_name,
                    abi,
                    bytecode,
                })
            }
        }
    }

    /// Read and parse an artifact file.
    pub fn load(path: &Path) -> ChainResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ChainError::Artifact(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let artifact = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            contract = artifact.contract_name.as_deref().unwrap_or("<abi>"),
            functions = artifact.abi.functions.len(),
            "Artifact loaded"
        );
        Ok(artifact)
    }

    /// Find the overload of `method` taking `arity` arguments.
    pub fn function(&self, method: &str, arity: usize) -> ChainResult<&Function> {
        let overloads = self
            .abi
            .function(method)
            .ok_or_else(|| ChainError::Abi(format!("Unknown method '{}'", method)))?;
        overloads
            .iter()
            .find(|f| f.inputs.len() == arity)
            .ok_or_else(|| {
                ChainError::Abi(format!(
                    "Method '{}' does not take {} argument(s)",
                    method, arity
                ))
            })
    }

    /// ABI-encode a call to `method` (selector + arguments).
    pub fn encode_call(&self, method: &str, args: &[CallArg]) -> ChainResult<Bytes> {
        let function = self.function(method, args.len())?;
        let values = coerce(function.inputs.iter().map(|p| p.resolve()), args)?;
        function
            .abi_encode_input(&values)
            .map(Bytes::from)
            .map_err(|e| ChainError::Abi(format!("Cannot encode '{}': {}", method, e)))
    }

    /// Decode the return data of `method`.
    pub fn decode_output(
        &self,
        method: &str,
        arity: usize,
        data: &[u8],
    ) -> ChainResult<Vec<DynSolValue>> {
        let function = self.function(method, arity)?;
        function
            .abi_decode_output(data)
            .map_err(|e| ChainError::Abi(format!("Cannot decode '{}' output: {}", method, e)))
    }

    /// Creation code followed by the encoded constructor arguments.
    pub fn deploy_code(&self, args: &[CallArg]) -> ChainResult<Bytes> {
        let bytecode = self
            .bytecode
            .as_ref()
            .ok_or_else(|| ChainError::Artifact("Artifact has no bytecode".to_string()))?;

        let encoded = match &self.abi.constructor {
            Some(constructor) => {
                if constructor.inputs.len() != args.len() {
                    return Err(ChainError::Abi(format!(
                        "Constructor takes {} argument(s), got {}",
                        constructor.inputs.len(),
                        args.len()
                    )));
                }
                let values = coerce(constructor.inputs.iter().map(|p| p.resolve()), args)?;
                constructor
                    .abi_encode_input(&values)
                    .map_err(|e| ChainError::Abi(format!("Cannot encode constructor: {}", e)))?
            }
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(ChainError::Abi(
                    "Contract has no constructor arguments".to_string(),
                ))
            }
        };

        let mut code = bytecode.to_vec();
        code.extend_from_slice(&encoded);
        Ok(Bytes::from(code))
    }

    /// Whether the ABI declares a `name()` view returning one value.
    pub fn has_name_accessor(&self) -> bool {
        self.abi.function("name").is_some_and(|overloads| {
            overloads.iter().any(|f| {
                f.inputs.is_empty()
                    && f.outputs.len() == 1
                    && matches!(
                        f.state_mutability,
                        StateMutability::View | StateMutability::Pure
                    )
            })
        })
    }
}

fn coerce<I, E>(types: I, args: &[CallArg]) -> ChainResult<Vec<DynSolValue>>
where
    I: Iterator<Item = Result<DynSolType, E>>,
    E: std::fmt::Display,
{
    types
        .zip(args)
        .map(|(ty, arg)| {
            let ty = ty.map_err(|e| ChainError::Abi(format!("Unsupported parameter type: {}", e)))?;
            arg.to_sol_value(&ty)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    const TOKEN_ABI: &str = r#"[
        {"type":"function","name":"name","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
        {"type":"function","name":"balanceOf","inputs":[{"name":"account","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}
    ]"#;

    const BALLOT_ARTIFACT: &str = r#"{
        "contractName": "Ballot",
        "abi": [
            {"type":"constructor","inputs":[{"name":"proposalNames","type":"bytes32[]"}],"stateMutability":"nonpayable"},
            {"type":"function","name":"vote","inputs":[{"name":"proposal","type":"uint256"}],"outputs":[],"stateMutability":"nonpayable"},
            {"type":"function","name":"winningProposal","inputs":[],"outputs":[{"name":"winningProposal_","type":"uint256"}],"stateMutability":"view"}
        ],
        "bytecode": "0x6080"
    }"#;

    #[test]
    fn test_bare_abi() {
        let artifact = ContractArtifact::from_json(TOKEN_ABI).unwrap();
        assert!(artifact.contract_name.is_none());
        assert!(artifact.bytecode.is_none());
        assert!(artifact.has_name_accessor());
    }

    #[test]
    fn test_hardhat_artifact() {
        let artifact = ContractArtifact::from_json(BALLOT_ARTIFACT).unwrap();
        assert_eq!(artifact.contract_name.as_deref(), Some("Ballot"));
        assert_eq!(artifact.bytecode.clone().unwrap().to_vec(), vec![0x60u8, 0x80]);
        assert!(!artifact.has_name_accessor());
    }

    #[test]
    fn test_encode_transfer() {
        let artifact = ContractArtifact::from_json(TOKEN_ABI).unwrap();
        let to = address!("00000000000000000000000000000000000000ab");
        let data = artifact
            .encode_call("transfer", &[to.into(), CallArg::Uint(U256::from(100))])
            .unwrap();

        // transfer(address,uint256)
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(data[4 + 31], 0xab);
        assert_eq!(data[4 + 63], 100);
    }

    #[test]
    fn test_unknown_method_and_arity() {
        let artifact = ContractArtifact::from_json(TOKEN_ABI).unwrap();
        let err = artifact.encode_call("mint", &[]).unwrap_err();
        assert_eq!(err.to_string(), "ABI error: Unknown method 'mint'");

        let err = artifact.encode_call("transfer", &[]).unwrap_err();
        assert!(err.to_string().contains("does not take 0 argument"));
    }

    #[test]
    fn test_deploy_code_appends_constructor_args() {
        let artifact = ContractArtifact::from_json(BALLOT_ARTIFACT).unwrap();
        let names = CallArg::Array(vec![
            crate::contract::format_bytes32_string("Proposal 1").unwrap().into(),
        ]);
        let code = artifact.deploy_code(&[names]).unwrap();
        // bytecode + offset + length + one word
        assert_eq!(code.len(), 2 + 32 * 3);
        assert_eq!(&code[..2], &[0x60, 0x80]);

        let err = artifact.deploy_code(&[]).unwrap_err();
        assert!(err.to_string().contains("Constructor takes 1"));
    }

    #[test]
    fn test_decode_output() {
        let artifact = ContractArtifact::from_json(BALLOT_ARTIFACT).unwrap();
        let mut data = [0u8; 32];
        data[31] = 2;
        let values = artifact.decode_output("winningProposal", 0, &data).unwrap();
        assert_eq!(values, vec![DynSolValue::Uint(U256::from(2), 256)]);
    }

    #[test]
    fn test_invalid_json() {
        let err = ContractArtifact::from_json("{\"abi\": 3}").unwrap_err();
        assert!(matches!(err, ChainError::Artifact(_)));
    }
}
