use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Direction of a trade flow as stored in the clean dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TradeType {
    #[serde(rename = "Export")]
    Export,
    #[serde(rename = "Import")]
    Import,
    #[serde(rename = "Net trade")]
    NetTrade,
}

impl TradeType {
    pub const ALL: [Self; 3] = [Self::Export, Self::Import, Self::NetTrade];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Export => "Export",
            Self::Import => "Import",
            Self::NetTrade => "Net trade",
        }
    }

    /// Export and Import are drawn as bars; net trade is an overlay.
    pub const fn is_flow(self) -> bool {
        matches!(self, Self::Export | Self::Import)
    }
}

impl Display for TradeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let folded = value.trim().to_ascii_lowercase();
        match folded.as_str() {
            "export" | "exports" => Ok(Self::Export),
            "import" | "imports" => Ok(Self::Import),
            "net trade" | "net_trade" | "net-trade" | "nettrade" => Ok(Self::NetTrade),
            _ => Err(ValidationError::InvalidTradeType {
                value: value.trim().to_owned(),
            }),
        }
    }
}
