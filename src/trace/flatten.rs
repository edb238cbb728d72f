//! Transaction normalizer
//!
//! Flattens a sandbox transaction into one uniform [`EdgeRow`]. Fee
//! components come from different execution phases and stay `None` when the
//! phase is missing, so "no fee" and "zero fee" remain distinguishable.

use crate::parser::{Address, Cell, body_op};
use crate::trace::models::{AccountStatus, ComputePhase, MessageInfo, Transaction};
use serde::Serialize;
use std::fmt;

/// Who sent the inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Sender {
    /// Message arrived from outside the chain
    External,
    Address(Address),
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sender::External => write!(f, "external"),
            Sender::Address(addr) => write!(f, "{}", addr),
        }
    }
}

impl From<Sender> for String {
    fn from(sender: Sender) -> Self {
        sender.to_string()
    }
}

/// Individually optional fee components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeeData {
    /// Gas fees of a VM compute phase
    pub compute_fee: Option<u128>,
    /// Storage phase fees collected
    pub storage_fee: Option<u128>,
    /// Action phase total forward fees
    pub total_fwd_fee: Option<u128>,
    /// Forward fee paid for the inbound internal message
    pub in_forward_fee: Option<u128>,
    /// Action phase total action fees
    pub total_action_fee: Option<u128>,
}

/// A transaction flattened for graph building
#[derive(Debug, Clone, Serialize)]
pub struct EdgeRow {
    pub lt: u64,
    /// `None` when the transaction had no inbound message
    pub from: Option<Sender>,
    pub to: Address,
    pub value: Option<u128>,
    pub total_fees: u128,
    pub fees: FeeData,
    pub op: Option<u32>,
    #[serde(skip)]
    pub body: Option<Cell>,
    pub exit_code: Option<i32>,
    pub action_result_code: Option<i32>,
    pub deploy: bool,
    pub aborted: Option<bool>,
    pub destroyed: Option<bool>,
    pub success: Option<bool>,
    pub bounced: Option<bool>,
}

impl EdgeRow {
    /// Transactions with no inbound message are origin transactions
    pub fn is_origin(&self) -> bool {
        self.from.is_none()
    }
}

/// Flatten one sandbox transaction
pub fn flatten(tx: &Transaction) -> EdgeRow {
    let in_msg = tx.in_message.as_ref();

    let from = in_msg.map(|msg| match &msg.info {
        MessageInfo::Internal { src, .. } => Sender::Address(*src),
        MessageInfo::ExternalIn { .. } | MessageInfo::ExternalOut { .. } => Sender::External,
    });
    let to = in_msg
        .and_then(|msg| msg.info.dest())
        .copied()
        .unwrap_or(tx.address);

    let (value, in_forward_fee, bounced) = match in_msg.map(|msg| &msg.info) {
        Some(MessageInfo::Internal {
            value,
            forward_fee,
            bounced,
            ..
        }) => (Some(*value), Some(*forward_fee), Some(*bounced)),
        _ => (None, None, None),
    };

    let body = in_msg.map(|msg| msg.body.clone());
    let op = body.as_ref().and_then(body_op);

    let deploy = in_msg.is_some_and(|msg| msg.init)
        && tx.old_status != AccountStatus::Active
        && tx.end_status == AccountStatus::Active;

    let mut fees = FeeData {
        in_forward_fee,
        ..FeeData::default()
    };
    let mut exit_code = None;
    let mut action_result_code = None;
    let mut aborted = None;
    let mut destroyed = None;
    let mut success = None;

    if let Some(phases) = tx.description.phases() {
        let compute_success = match &phases.compute_phase {
            ComputePhase::Vm {
                success,
                gas_fees,
                exit_code: code,
                ..
            } => {
                fees.compute_fee = Some(*gas_fees);
                exit_code = Some(*code);
                *success
            }
            ComputePhase::Skipped { .. } => false,
        };
        fees.storage_fee = phases
            .storage_phase
            .as_ref()
            .map(|storage| storage.storage_fees_collected);
        if let Some(action) = &phases.action_phase {
            fees.total_fwd_fee = action.total_fwd_fees;
            fees.total_action_fee = action.total_action_fees;
            action_result_code = Some(action.result_code);
        }
        aborted = Some(phases.aborted);
        destroyed = Some(phases.destroyed);
        success = Some(
            compute_success
                && phases
                    .action_phase
                    .as_ref()
                    .is_some_and(|action| action.success),
        );
    }

    EdgeRow {
        lt: tx.lt,
        from,
        to,
        value,
        total_fees: tx.total_fees,
        fees,
        op,
        body,
        exit_code,
        action_result_code,
        deploy,
        aborted,
        destroyed,
        success,
        bounced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::begin_message;
    use crate::trace::models::{
        ActionPhase, Message, Phases, StoragePhase, TransactionDescription,
    };

    fn addr(byte: u8) -> Address {
        Address::new(0, [byte; 32])
    }

    fn vm_phases(exit_code: i32) -> Phases {
        Phases {
            storage_phase: Some(StoragePhase {
                storage_fees_collected: 0,
            }),
            compute_phase: ComputePhase::Vm {
                success: exit_code == 0,
                gas_fees: 1_000,
                exit_code,
                gas_used: 10,
            },
            action_phase: Some(ActionPhase {
                success: true,
                result_code: 0,
                total_fwd_fees: Some(200),
                total_action_fees: None,
            }),
            aborted: exit_code != 0,
            destroyed: false,
        }
    }

    fn tx(in_message: Option<Message>, description: TransactionDescription) -> Transaction {
        Transaction {
            address: addr(9),
            lt: 1,
            now: 0,
            in_message,
            out_messages_count: 0,
            old_status: AccountStatus::Active,
            end_status: AccountStatus::Active,
            total_fees: 1_500,
            description,
        }
    }

    fn internal(value: u128, body: Cell) -> Message {
        Message {
            info: MessageInfo::Internal {
                src: addr(1),
                dest: addr(2),
                value,
                forward_fee: 7,
                bounce: true,
                bounced: false,
            },
            init: false,
            body,
        }
    }

    #[test]
    fn test_internal_message() {
        let body = begin_message(0x0f8a7ea5, 0).unwrap().end_cell();
        let row = flatten(&tx(
            Some(internal(3, body)),
            TransactionDescription::Generic(vm_phases(0)),
        ));

        assert_eq!(row.from, Some(Sender::Address(addr(1))));
        assert_eq!(row.to, addr(2));
        assert_eq!(row.value, Some(3));
        assert_eq!(row.op, Some(0x0f8a7ea5));
        assert_eq!(row.exit_code, Some(0));
        assert_eq!(row.action_result_code, Some(0));
        assert_eq!(row.success, Some(true));
        assert_eq!(row.aborted, Some(false));
        assert_eq!(row.bounced, Some(false));
        assert!(!row.deploy);
    }

    #[test]
    fn test_fee_components_keep_presence() {
        let row = flatten(&tx(
            Some(internal(3, Cell::empty())),
            TransactionDescription::Generic(vm_phases(0)),
        ));

        assert_eq!(row.fees.compute_fee, Some(1_000));
        // present but zero
        assert_eq!(row.fees.storage_fee, Some(0));
        assert_eq!(row.fees.total_fwd_fee, Some(200));
        assert_eq!(row.fees.in_forward_fee, Some(7));
        assert_eq!(row.fees.total_action_fee, None);
        assert_eq!(row.total_fees, 1_500);
        assert_eq!(row.op, None);
    }

    #[test]
    fn test_missing_phases() {
        let mut phases = vm_phases(0);
        phases.storage_phase = None;
        phases.action_phase = None;
        phases.compute_phase = ComputePhase::Skipped {
            reason: "no_gas".to_string(),
        };
        let row = flatten(&tx(
            Some(internal(3, Cell::empty())),
            TransactionDescription::Generic(phases),
        ));

        assert_eq!(row.fees.compute_fee, None);
        assert_eq!(row.fees.storage_fee, None);
        assert_eq!(row.exit_code, None);
        assert_eq!(row.action_result_code, None);
        assert_eq!(row.success, Some(false));
    }

    #[test]
    fn test_external_in_and_origin() {
        let ext = Message {
            info: MessageInfo::ExternalIn {
                dest: addr(4),
                import_fee: 0,
            },
            init: false,
            body: Cell::empty(),
        };
        let row = flatten(&tx(Some(ext), TransactionDescription::Generic(vm_phases(0))));
        assert_eq!(row.from, Some(Sender::External));
        assert_eq!(row.to, addr(4));
        assert_eq!(row.value, None);
        assert!(!row.is_origin());

        let row = flatten(&tx(None, TransactionDescription::StorageOnly));
        assert!(row.is_origin());
        assert_eq!(row.to, addr(9));
        assert_eq!(row.exit_code, None);
        assert_eq!(row.aborted, None);
    }

    #[test]
    fn test_deploy_flag() {
        let mut msg = internal(3, Cell::empty());
        msg.init = true;
        let mut t = tx(Some(msg), TransactionDescription::Generic(vm_phases(0)));
        t.old_status = AccountStatus::Uninit;
        assert!(flatten(&t).deploy);

        t.old_status = AccountStatus::Active;
        assert!(!flatten(&t).deploy);
    }
}
