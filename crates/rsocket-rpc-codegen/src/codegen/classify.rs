//! Interaction classification
//!
//! Every method maps to exactly one [`InteractionSemantic`]. The decision is
//! made once here and threaded through route building, planning and
//! rendering, so no other module looks at the raw streaming flags.
//!
//! Precedence: client streaming dominates server streaming, which dominates
//! one-way. One-way only applies to the plain unary shape.

use serde::{Deserialize, Serialize};

use crate::descriptor::MethodDefinition;

/// The four interaction shapes a method can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionSemantic {
    /// Single request, no response (fire-and-forget)
    OneWay,
    /// Single request, single response
    UnarySingleResponse,
    /// Single request, stream of responses
    ServerStream,
    /// Stream of requests, single response or stream of responses (channel)
    ClientOrBidiStream,
}

impl InteractionSemantic {
    /// Every semantic, in dispatch-table order
    pub const ALL: [Self; 4] = [
        Self::OneWay,
        Self::UnarySingleResponse,
        Self::ServerStream,
        Self::ClientOrBidiStream,
    ];

    /// Interaction model name as used by the transport
    #[must_use]
    pub const fn interaction_name(self) -> &'static str {
        match self {
            Self::OneWay => "Fire And Forget",
            Self::UnarySingleResponse => "Request Response",
            Self::ServerStream => "Request Stream",
            Self::ClientOrBidiStream => "Request Channel",
        }
    }

    /// Suffix appended to generated per-method handler names
    #[must_use]
    pub const fn handler_suffix(self) -> &'static str {
        match self {
            Self::OneWay => "FireAndForget",
            Self::UnarySingleResponse => "RequestResponse",
            Self::ServerStream => "RequestStream",
            Self::ClientOrBidiStream => "RequestChannel",
        }
    }

    /// Whether the generated handler produces no value
    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(self, Self::OneWay)
    }
}

impl std::fmt::Display for InteractionSemantic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneWay => write!(f, "OneWay"),
            Self::UnarySingleResponse => write!(f, "UnarySingleResponse"),
            Self::ServerStream => write!(f, "ServerStream"),
            Self::ClientOrBidiStream => write!(f, "ClientOrBidiStream"),
        }
    }
}

/// Classify from the raw attribute triple
#[must_use]
pub const fn classify_flags(
    client_streaming: bool,
    server_streaming: bool,
    one_way: bool,
) -> InteractionSemantic {
    if client_streaming {
        InteractionSemantic::ClientOrBidiStream
    } else if server_streaming {
        InteractionSemantic::ServerStream
    } else if one_way {
        InteractionSemantic::OneWay
    } else {
        InteractionSemantic::UnarySingleResponse
    }
}

/// Classify a method
#[must_use]
pub fn classify(method: &MethodDefinition) -> InteractionSemantic {
    classify_flags(
        method.client_streaming,
        method.server_streaming,
        method.one_way,
    )
}
