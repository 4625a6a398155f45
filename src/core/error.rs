use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Unknown opcode {opcode:#04x} at script offset {address:#06x}")]
    UnknownOpcode { opcode: u8, address: usize },

    #[error("AI call stack overflow at script offset {address:#06x} (depth {depth})")]
    CallStackOverflow { address: usize, depth: usize },

    #[error("Script read of {len} byte(s) at offset {address:#06x} is out of bounds")]
    ScriptOutOfBounds { address: usize, len: usize },

    #[error("No script entry point for logic module {0}")]
    UnknownModule(u8),

    #[error("Invalid script: {0}")]
    InvalidScript(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl AiError {
    /// Faults caused by corrupt or mis-authored script data
    pub fn is_script_fault(&self) -> bool {
        matches!(
            self,
            AiError::UnknownOpcode { .. }
                | AiError::CallStackOverflow { .. }
                | AiError::ScriptOutOfBounds { .. }
                | AiError::UnknownModule(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AiError>;
