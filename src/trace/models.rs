//! Core data models for sandbox execution traces
//!
//! This module defines the transaction records produced by the execution
//! sandbox: the inbound message, account status and the per-phase
//! description that fees and exit codes are read from.

use crate::parser::{Address, Cell};
use serde::{Deserialize, Serialize};

/// Result of sending one message into the sandbox: every transaction it caused, in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    pub transactions: Vec<Transaction>,
}

impl Trace {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// One executed transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Account the transaction ran on
    pub address: Address,

    /// Logical time
    #[serde(default)]
    pub lt: u64,

    /// Unix time of execution
    #[serde(default)]
    pub now: u32,

    /// Message that triggered the transaction, absent for tick-tock
    #[serde(default)]
    pub in_message: Option<Message>,

    #[serde(default)]
    pub out_messages_count: u32,

    #[serde(default)]
    pub old_status: AccountStatus,

    #[serde(default)]
    pub end_status: AccountStatus,

    /// Aggregate fees charged by the transaction
    #[serde(default)]
    pub total_fees: u128,

    pub description: TransactionDescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Uninit,
    Frozen,
    Active,
    NonExist,
}

/// Inbound or outbound message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub info: MessageInfo,

    /// Whether the message carries a state init
    #[serde(default)]
    pub init: bool,

    #[serde(default)]
    pub body: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageInfo {
    Internal {
        src: Address,
        dest: Address,
        value: u128,
        #[serde(default)]
        forward_fee: u128,
        #[serde(default)]
        bounce: bool,
        #[serde(default)]
        bounced: bool,
    },
    ExternalIn {
        dest: Address,
        #[serde(default)]
        import_fee: u128,
    },
    ExternalOut {
        src: Address,
    },
}

impl MessageInfo {
    pub fn dest(&self) -> Option<&Address> {
        match self {
            MessageInfo::Internal { dest, .. } | MessageInfo::ExternalIn { dest, .. } => Some(dest),
            MessageInfo::ExternalOut { .. } => None,
        }
    }
}

/// Execution description, only ordinary and tick-tock transactions carry phases
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDescription {
    Generic(Phases),
    TickTock { is_tock: bool, phases: Phases },
    StorageOnly,
    SplitPrepare,
    SplitInstall,
    MergePrepare,
    MergeInstall,
}

impl TransactionDescription {
    pub fn phases(&self) -> Option<&Phases> {
        match self {
            TransactionDescription::Generic(phases) => Some(phases),
            TransactionDescription::TickTock { phases, .. } => Some(phases),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phases {
    #[serde(default)]
    pub storage_phase: Option<StoragePhase>,

    pub compute_phase: ComputePhase,

    #[serde(default)]
    pub action_phase: Option<ActionPhase>,

    #[serde(default)]
    pub aborted: bool,

    #[serde(default)]
    pub destroyed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePhase {
    pub storage_fees_collected: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputePhase {
    Skipped {
        #[serde(default)]
        reason: String,
    },
    Vm {
        success: bool,
        gas_fees: u128,
        exit_code: i32,
        #[serde(default)]
        gas_used: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPhase {
    pub success: bool,
    pub result_code: i32,
    #[serde(default)]
    pub total_fwd_fees: Option<u128>,
    #[serde(default)]
    pub total_action_fees: Option<u128>,
}
