//! Raw-form account addresses

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A standard internal address (`workchain:hash`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    pub workchain: i8,
    pub hash: [u8; 32],
}

impl Address {
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (wc, hash_hex) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidAddress(format!("missing workchain in '{}'", s)))?;
        let workchain = wc
            .parse::<i8>()
            .map_err(|e| Error::InvalidAddress(format!("bad workchain in '{}': {}", s, e)))?;
        let bytes = hex::decode(hash_hex)
            .map_err(|e| Error::InvalidAddress(format!("bad hash in '{}': {}", s, e)))?;
        let hash: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidAddress(format!("hash in '{}' is not 32 bytes", s)))?;
        Ok(Self { workchain, hash })
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}
