use core::fmt::{self, Display, Formatter};

use crate::{any::TypeInfo, instantiator::Signature};

#[derive(thiserror::Error, Debug, Clone)]
pub enum ValidateErrorKind {
    Missing {
        signature: Signature,
        position: usize,
        type_info: TypeInfo,
    },
    /// Keys from the first occurrence of the repeated key back to itself
    Cycle { path: Box<[TypeInfo]> },
}

impl Display for ValidateErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing {
                signature,
                position,
                type_info,
            } => write!(
                f,
                "unable to satisfy constructor {signature}: unable to satisfy param {position}: no constructor or value for {type_info}"
            ),
            Self::Cycle { path } => {
                write!(f, "dependency cycle")?;
                for (index, type_info) in path.iter().enumerate() {
                    if index == 0 {
                        write!(f, ": {type_info}")?;
                    } else {
                        write!(f, ": depends on {type_info}")?;
                    }
                }
                Ok(())
            }
        }
    }
}
