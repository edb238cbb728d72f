//! Caption decoder registry
//!
//! Maps an op code to a decoder that reads the message body and produces
//! extra `label: value` lines for the edge. The built-in set covers the
//! common jetton and DEX messages; callers layer their own decoders on top.

use crate::codes::{CodeBook, hex_code};
use crate::parser::cell::{Cell, Slice};
use crate::units::format_coins;
use crate::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

pub const OP_INTERNAL_TRANSFER: u32 = 0x178d4519;
pub const OP_SWAP: u32 = 0x25938561;
pub const OP_TRANSFER: u32 = 0x0f8a7ea5;
pub const OP_PAY_TO: u32 = 0xf93bb43f;
pub const OP_DEPOSIT_REF_FEE: u32 = 0x537c5a70;
pub const OP_TRANSFER_NOTIFICATION: u32 = 0x7362d09c;

/// Width of the `op:uint32 query_id:uint64` header
const HEADER_BITS: usize = 32 + 64;

/// Ordered label/value pairs produced by a decoder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captions(Vec<(String, String)>);

impl Captions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl fmt::Display) {
        self.0.push((label.into(), value.to_string()));
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Input handed to every decoder
#[derive(Debug, Clone, Copy)]
pub struct CaptionParams<'a> {
    pub body: &'a Cell,
    pub codes: &'a CodeBook,
    pub hide_ok_values: bool,
}

/// Decodes a message body into captions
///
/// A failing decode is expected for bounced or truncated bodies; the caller
/// drops the captions for that edge only.
pub trait CaptionDecoder: Send + Sync {
    fn decode(&self, params: &CaptionParams<'_>) -> Result<Captions>;
}

impl<F> CaptionDecoder for F
where
    F: Fn(&CaptionParams<'_>) -> Result<Captions> + Send + Sync,
{
    fn decode(&self, params: &CaptionParams<'_>) -> Result<Captions> {
        self(params)
    }
}

pub type CaptionHandler = Arc<dyn CaptionDecoder>;

/// Op code → decoder mapping
#[derive(Clone, Default)]
pub struct CaptionRegistry {
    handlers: HashMap<u32, CaptionHandler>,
}

impl fmt::Debug for CaptionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ops: Vec<String> = self.ops().into_iter().map(|op| hex_code(op.into())).collect();
        ops.sort();
        f.debug_struct("CaptionRegistry").field("ops", &ops).finish()
    }
}

impl CaptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in registry, constructed on first use and shared afterwards
    pub fn shared_defaults() -> &'static CaptionRegistry {
        static DEFAULTS: LazyLock<CaptionRegistry> = LazyLock::new(CaptionRegistry::with_defaults);
        &DEFAULTS
    }

    /// Registry holding the built-in decoders
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(OP_INTERNAL_TRANSFER, internal_transfer);
        registry.insert(OP_SWAP, swap);
        registry.insert(OP_TRANSFER, transfer);
        registry.insert(OP_PAY_TO, pay_to);
        registry.insert(OP_DEPOSIT_REF_FEE, deposit_ref_fee);
        registry.insert(OP_TRANSFER_NOTIFICATION, transfer_notification);
        registry
    }

    /// Register a decoder, replacing any previous one for the op
    pub fn insert(&mut self, op: u32, decoder: impl CaptionDecoder + 'static) {
        self.handlers.insert(op, Arc::new(decoder));
    }

    pub fn with(mut self, op: u32, decoder: impl CaptionDecoder + 'static) -> Self {
        self.insert(op, decoder);
        self
    }

    pub fn get(&self, op: u32) -> Option<&CaptionHandler> {
        self.handlers.get(&op)
    }

    pub fn contains(&self, op: u32) -> bool {
        self.handlers.contains_key(&op)
    }

    pub fn ops(&self) -> Vec<u32> {
        self.handlers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Union of both registries; `overrides` replaces entries per op
    pub fn merged(&self, overrides: &CaptionRegistry) -> CaptionRegistry {
        let mut handlers = self.handlers.clone();
        for (op, handler) in &overrides.handlers {
            handlers.insert(*op, Arc::clone(handler));
        }
        CaptionRegistry { handlers }
    }
}

fn skip_header(sc: &mut Slice<'_>) -> Result<()> {
    sc.skip(HEADER_BITS)
}

/// Run `f` and keep whatever it collected even when it fails part way
fn partial(f: impl FnOnce(&mut Captions) -> Result<()>) -> Result<Captions> {
    let mut res = Captions::new();
    if let Err(e) = f(&mut res) {
        tracing::debug!("caption decode stopped early: {}", e);
    }
    Ok(res)
}

/// Read a 32-bit code stored either inline or in the next ref, per the leading either-bit
fn load_either_op(sc: &mut Slice<'_>) -> Result<u32> {
    if sc.load_bit()? {
        let inner = sc.load_ref()?;
        Ok(inner.parse().load_uint(32)? as u32)
    } else {
        Ok(sc.load_uint(32)? as u32)
    }
}

fn internal_transfer(params: &CaptionParams<'_>) -> Result<Captions> {
    let mut sc = params.body.parse();
    skip_header(&mut sc)?;
    let amount = sc.load_coins()?;

    let mut res = Captions::new();
    res.push("amount", format_coins(amount));
    Ok(res)
}

fn swap(params: &CaptionParams<'_>) -> Result<Captions> {
    let mut sc = params.body.parse();
    skip_header(&mut sc)?;
    sc.load_address()?;
    let amount = sc.load_coins()? + sc.load_coins()?;

    let mut res = Captions::new();
    res.push("amount", format_coins(amount));
    Ok(res)
}

fn transfer(params: &CaptionParams<'_>) -> Result<Captions> {
    let mut sc = params.body.parse();
    skip_header(&mut sc)?;
    let amount = sc.load_coins()?;
    sc.load_maybe_address()?; // destination
    sc.load_maybe_address()?; // response destination
    if sc.load_bit()? {
        sc.load_ref()?; // custom payload
    }
    let fwd = sc.load_coins()?;

    let mut res = Captions::new();
    if !params.hide_ok_values || fwd != 0 {
        res.push("fwdTon", format_coins(fwd));
    }
    res.push("amount", format_coins(amount));

    // The forward payload is optional and often empty
    if let Ok(code) = load_either_op(&mut sc) {
        res.push("txCode", params.codes.any_label(i64::from(code)));
    }
    Ok(res)
}

fn pay_to(params: &CaptionParams<'_>) -> Result<Captions> {
    partial(|res| {
        let mut sc = params.body.parse();
        skip_header(&mut sc)?;
        sc.load_address()?;
        sc.load_address()?;
        let pay_code = sc.load_uint(32)?;
        res.push("pay", params.codes.ops.label(pay_code as i64));
        Ok(())
    })
}

fn deposit_ref_fee(params: &CaptionParams<'_>) -> Result<Captions> {
    partial(|res| {
        let mut sc = params.body.parse();
        skip_header(&mut sc)?;
        res.push("amount", format_coins(sc.load_coins()?));
        Ok(())
    })
}

fn transfer_notification(params: &CaptionParams<'_>) -> Result<Captions> {
    partial(|res| {
        let mut sc = params.body.parse();
        skip_header(&mut sc)?;
        res.push("amount", format_coins(sc.load_coins()?));
        sc.load_address()?; // sender
        let fwd_op = load_either_op(&mut sc)?;
        if fwd_op != 0 {
            res.push("fwdOp", params.codes.op_label(fwd_op));
        }
        Ok(())
    })
}
