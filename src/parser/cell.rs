//! Cells and the binary cursor used to read message bodies
//!
//! A cell carries up to 1023 data bits and up to four child cells. Bodies
//! are read sequentially through a [`Slice`]; every read that runs past the
//! end of the data is reported as [`Error::Decode`] so callers can drop the
//! field instead of aborting.

use crate::parser::address::Address;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MAX_CELL_BITS: usize = 1023;
pub const MAX_CELL_REFS: usize = 4;

/// An immutable bag of bits with child references
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CellRepr", into = "CellRepr")]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

/// Wire form of a cell inside trace files
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CellRepr {
    bits: String,
    len: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    refs: Vec<Cell>,
}

impl TryFrom<CellRepr> for Cell {
    type Error = Error;

    fn try_from(repr: CellRepr) -> Result<Self> {
        let data = hex::decode(&repr.bits)
            .map_err(|e| Error::decode(format!("invalid cell bits '{}': {}", repr.bits, e)))?;
        crate::ensure!(
            repr.len <= MAX_CELL_BITS && data.len() * 8 >= repr.len,
            "cell declares {} bits but carries {} bytes",
            repr.len,
            data.len()
        );
        crate::ensure!(
            repr.refs.len() <= MAX_CELL_REFS,
            "cell has {} refs, at most {} allowed",
            repr.refs.len(),
            MAX_CELL_REFS
        );

        let mut data = data;
        data.truncate(repr.len.div_ceil(8));
        Ok(Cell {
            data,
            bit_len: repr.len,
            refs: repr.refs.into_iter().map(Arc::new).collect(),
        })
    }
}

impl From<Cell> for CellRepr {
    fn from(cell: Cell) -> Self {
        CellRepr {
            bits: hex::encode(&cell.data),
            len: cell.bit_len,
            refs: cell.refs.iter().map(|r| r.as_ref().clone()).collect(),
        }
    }
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    /// Start reading the cell from its first bit
    pub fn parse(&self) -> Slice<'_> {
        Slice {
            cell: self,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    fn bit(&self, pos: usize) -> bool {
        (self.data[pos / 8] >> (7 - (pos % 8))) & 1 == 1
    }
}

/// Sequential reader over a cell
#[derive(Debug, Clone)]
pub struct Slice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> Slice<'a> {
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len - self.bit_pos
    }

    pub fn remaining_refs(&self) -> usize {
        self.cell.refs.len() - self.ref_pos
    }

    fn ensure_bits(&self, bits: usize) -> Result<()> {
        if bits > self.remaining_bits() {
            return Err(Error::decode(format!(
                "cell underflow: need {} bits, {} left",
                bits,
                self.remaining_bits()
            )));
        }
        Ok(())
    }

    pub fn skip(&mut self, bits: usize) -> Result<()> {
        self.ensure_bits(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    pub fn load_bit(&mut self) -> Result<bool> {
        self.ensure_bits(1)?;
        let bit = self.cell.bit(self.bit_pos);
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Read an unsigned big-endian integer of up to 128 bits
    pub fn load_uint_big(&mut self, bits: usize) -> Result<u128> {
        if bits > 128 {
            return Err(Error::decode(format!("cannot load {} bits into u128", bits)));
        }
        self.ensure_bits(bits)?;
        let mut value: u128 = 0;
        for _ in 0..bits {
            value = (value << 1) | u128::from(self.cell.bit(self.bit_pos));
            self.bit_pos += 1;
        }
        Ok(value)
    }

    /// Read an unsigned big-endian integer of up to 64 bits
    pub fn load_uint(&mut self, bits: usize) -> Result<u64> {
        if bits > 64 {
            return Err(Error::decode(format!("cannot load {} bits into u64", bits)));
        }
        Ok(self.load_uint_big(bits)? as u64)
    }

    /// Read a two's complement signed integer of up to 64 bits
    pub fn load_int(&mut self, bits: usize) -> Result<i64> {
        if bits == 0 || bits > 64 {
            return Err(Error::decode(format!("cannot load {} bits into i64", bits)));
        }
        let raw = self.load_uint(bits)?;
        let shift = 64 - bits;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Read a `VarUInteger 16` amount
    pub fn load_coins(&mut self) -> Result<u128> {
        let len = self.load_uint(4)? as usize;
        self.load_uint_big(len * 8)
    }

    /// Read a standard internal address, failing on `addr_none`
    pub fn load_address(&mut self) -> Result<Address> {
        self.load_maybe_address()?
            .ok_or_else(|| Error::decode("expected address, found addr_none"))
    }

    /// Read an internal address, `None` for `addr_none`
    pub fn load_maybe_address(&mut self) -> Result<Option<Address>> {
        match self.load_uint(2)? {
            0b00 => Ok(None),
            0b10 => {
                if self.load_bit()? {
                    return Err(Error::decode("anycast addresses are not supported"));
                }
                let workchain = self.load_int(8)? as i8;
                let mut hash = [0u8; 32];
                for byte in hash.iter_mut() {
                    *byte = self.load_uint(8)? as u8;
                }
                Ok(Some(Address::new(workchain, hash)))
            }
            tag => Err(Error::decode(format!("unsupported address tag {:#04b}", tag))),
        }
    }

    pub fn load_ref(&mut self) -> Result<&'a Cell> {
        let cell: &'a Cell = self.cell;
        let child = cell
            .refs
            .get(self.ref_pos)
            .ok_or_else(|| Error::decode("cell underflow: no refs left"))?;
        self.ref_pos += 1;
        Ok(child.as_ref())
    }
}

/// Writer producing cells, the inverse of [`Slice`]
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_bit(mut self, bit: bool) -> Result<Self> {
        if self.bit_len >= MAX_CELL_BITS {
            return Err(Error::decode("cell overflow"));
        }
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 1 << (7 - (self.bit_len % 8));
        }
        self.bit_len += 1;
        Ok(self)
    }

    pub fn store_uint(mut self, value: u128, bits: usize) -> Result<Self> {
        if bits < 128 && value >> bits != 0 {
            return Err(Error::decode(format!("{} does not fit in {} bits", value, bits)));
        }
        for i in (0..bits).rev() {
            let bit = i < 128 && (value >> i) & 1 == 1;
            self = self.store_bit(bit)?;
        }
        Ok(self)
    }

    pub fn store_int(self, value: i64, bits: usize) -> Result<Self> {
        let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
        self.store_uint(u128::from(value as u64 & mask), bits)
    }

    pub fn store_coins(self, amount: u128) -> Result<Self> {
        let len = (128 - amount.leading_zeros() as usize).div_ceil(8);
        if len > 15 {
            return Err(Error::decode(format!("{} does not fit in coins", amount)));
        }
        self.store_uint(len as u128, 4)?.store_uint(amount, len * 8)
    }

    pub fn store_address(self, address: &Address) -> Result<Self> {
        let mut builder = self
            .store_uint(0b10, 2)?
            .store_bit(false)?
            .store_int(i64::from(address.workchain), 8)?;
        for byte in address.hash {
            builder = builder.store_uint(u128::from(byte), 8)?;
        }
        Ok(builder)
    }

    pub fn store_maybe_address(self, address: Option<&Address>) -> Result<Self> {
        match address {
            Some(addr) => self.store_address(addr),
            None => self.store_uint(0, 2),
        }
    }

    pub fn store_ref(mut self, cell: Cell) -> Result<Self> {
        if self.refs.len() >= MAX_CELL_REFS {
            return Err(Error::decode("cell overflow: too many refs"));
        }
        self.refs.push(Arc::new(cell));
        Ok(self)
    }

    pub fn end_cell(self) -> Cell {
        Cell {
            data: self.data,
            bit_len: self.bit_len,
            refs: self.refs,
        }
    }
}

/// Start a message body with the conventional `op:uint32 query_id:uint64` header
pub fn begin_message(op: u32, query_id: u64) -> Result<CellBuilder> {
    CellBuilder::new()
        .store_uint(u128::from(op), 32)?
        .store_uint(u128::from(query_id), 64)
}
