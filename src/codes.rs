//! Code registries
//!
//! Maps numeric operation and exit codes to canonical snake_case labels.
//! Codes without a label render as hexadecimal literals.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Op code of the excess-return message
pub const EXCESS_OP: u32 = 0xd53276db;

/// TVM compute/action phase exit codes
pub const TVM_EXIT_CODES: &[(&str, i64)] = &[
    ("ok", 0),
    ("okAlt", 1),
    ("stackUnderflow", 2),
    ("stackOverflow", 3),
    ("intOverflow", 4),
    ("intOutOfRange", 5),
    ("invalidOpCode", 6),
    ("typeCheckError", 7),
    ("cellOverflow", 8),
    ("cellUnderflow", 9),
    ("dictError", 10),
    ("getMethodNotFound11", 11),
    ("impossible", 12),
    ("outOfGas", 13),
    ("outOfGasAlt", -14),
    ("actionListInvalid", 32),
    ("actionInvalid", 34),
    ("notEnoughTon", 37),
    ("notEnoughExtra", 38),
];

/// Standard fungible token op codes
pub const STD_FT_OP_CODES: &[(&str, i64)] = &[
    ("ftTransfer", 0x0f8a7ea5),
    ("ftTransferNotification", 0x7362d09c),
    ("ftBurn", 0x595f07bc),
    ("ftProvideWalletAddress", 0x2c76b973),
    ("ftTakeWalletAddress", 0xd1735400),
    ("excesses", EXCESS_OP as i64),
];

/// Standard NFT op codes
pub const STD_NFT_OP_CODES: &[(&str, i64)] = &[
    ("nftTransfer", 0x5fcc3d14),
    ("nftOwnershipAssigned", 0x05138d91),
    ("nftGetStaticData", 0x2fcb26a2),
    ("nftReportStaticData", 0x8b771735),
    ("nftGetRoyaltyParams", 0x693d3950),
    ("nftReportRoyaltyParams", 0xa8cb00ad),
    ("nftEditContent", 0x1a0b9d51),
    ("nftTransferEditorship", 0x1c04412a),
    ("nftEditorshipAssigned", 0x511a4463),
    ("excesses", EXCESS_OP as i64),
];

/// Jetton wallet op codes
pub const JETTON_WALLET_OP_CODES: &[(&str, i64)] = &[
    ("transfer", 0x0f8a7ea5),
    ("internalTransfer", 0x178d4519),
    ("burn", 0x595f07bc),
];

/// Jetton minter op codes
pub const JETTON_MINTER_OP_CODES: &[(&str, i64)] = &[
    ("burnNotification", 0x7bdd97de),
    ("mint", 21),
    ("changeAdmin", 3),
    ("changeContent", 4),
    ("internalTransfer", 0x178d4519),
];

/// Op codes of DEX routers
pub const DEX_OP_CODES: &[(&str, i64)] = &[("swap", 0x25938561)];

static WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z]{2,}|[A-Z]?[a-z]+[0-9]*|[A-Z]|[0-9]+").expect("valid word pattern")
});

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Whether an acronym ending at `end` may stop there: the next word starts
/// with a capital followed by lowercase, or the identifier word ends.
fn acronym_ends_at(bytes: &[u8], end: usize) -> bool {
    match bytes.get(end) {
        None => true,
        Some(b) if b.is_ascii_uppercase() => bytes
            .get(end + 1)
            .is_some_and(|next| next.is_ascii_lowercase()),
        Some(&b) => !is_word_byte(b),
    }
}

/// Convert an identifier to lower snake_case.
///
/// An acronym run only stays together when it is followed by a capitalized
/// word or ends the identifier (`ABCDef` is `abc_def`, `HTTP` is `http`);
/// otherwise its capitals split one by one (`ABC1` is `a_b_c_1`). Anything
/// that is not a letter or digit, such as `::`, separates words.
pub fn to_snake_case(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut words: Vec<String> = Vec::new();
    let mut pos = 0;
    while let Some(m) = WORDS.find_at(name, pos) {
        let word = m.as_str();
        let mut end = m.end();
        if word.len() >= 2 && word.bytes().all(|b| b.is_ascii_uppercase()) {
            // Longest acronym prefix that may end where it stops, else a single capital
            end = (m.start() + 2..=m.end())
                .rev()
                .find(|&e| acronym_ends_at(bytes, e))
                .unwrap_or(m.start() + 1);
        }
        words.push(name[m.start()..end].to_lowercase());
        pos = end;
    }
    words.join("_")
}

/// Format a code as a hexadecimal literal
pub fn hex_code(code: i64) -> String {
    if code < 0 {
        format!("-0x{:x}", code.unsigned_abs())
    } else {
        format!("0x{:x}", code)
    }
}

/// Immutable mapping of numeric code to canonical label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeMap {
    labels: HashMap<i64, String>,
}

impl CodeMap {
    /// Build from a name→code table. When two names share a code the later one wins.
    pub fn from_table<I, S>(table: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut map = Self::default();
        map.extend_table(table);
        map
    }

    /// Layer another table on top, later entries overriding earlier ones
    pub fn extend_table<I, S>(&mut self, table: I)
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        for (name, code) in table {
            if let Some(prev) = self.labels.insert(code, to_snake_case(name.as_ref())) {
                tracing::trace!("code {} relabeled, was {}", hex_code(code), prev);
            }
        }
    }

    pub fn get(&self, code: i64) -> Option<&str> {
        self.labels.get(&code).map(String::as_str)
    }

    /// Canonical label, or the hexadecimal form when the code is unknown
    pub fn label(&self, code: i64) -> String {
        self.get(code)
            .map(str::to_string)
            .unwrap_or_else(|| hex_code(code))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The two registries a render needs: op codes and exit/error codes
#[derive(Debug, Clone, Default)]
pub struct CodeBook {
    pub ops: CodeMap,
    pub errors: CodeMap,
}

impl CodeBook {
    pub fn new(ops: CodeMap, errors: CodeMap) -> Self {
        Self { ops, errors }
    }

    /// Registries preloaded with the well-known token, NFT and TVM codes
    pub fn standard() -> Self {
        let mut ops = CodeMap::default();
        for table in [
            STD_FT_OP_CODES,
            STD_NFT_OP_CODES,
            JETTON_WALLET_OP_CODES,
            JETTON_MINTER_OP_CODES,
            DEX_OP_CODES,
        ] {
            ops.extend_table(table.iter().copied());
        }
        Self {
            ops,
            errors: CodeMap::from_table(TVM_EXIT_CODES.iter().copied()),
        }
    }

    /// Label an op code
    pub fn op_label(&self, op: u32) -> String {
        self.ops.label(i64::from(op))
    }

    /// Label an exit or action result code
    pub fn error_label(&self, code: i32) -> String {
        self.errors.label(i64::from(code))
    }

    /// Resolve a code that may be either an op or an error, ops first
    pub fn any_label(&self, code: i64) -> String {
        self.ops
            .get(code)
            .or_else(|| self.errors.get(code))
            .map(str::to_string)
            .unwrap_or_else(|| hex_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("ftTransfer"), "ft_transfer");
        assert_eq!(to_snake_case("getMethodNotFound11"), "get_method_not_found11");
        assert_eq!(to_snake_case("ABCDef"), "abc_def");
        assert_eq!(to_snake_case("HTTP"), "http");
        assert_eq!(to_snake_case("op::transfer"), "op_transfer");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("A1"), "a_1");
    }

    #[test]
    fn test_snake_case_acronym_boundaries() {
        assert_eq!(to_snake_case("ABC1"), "a_b_c_1");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("ABC::Foo"), "abc_foo");
        assert_eq!(to_snake_case("ABC_def"), "a_b_c_def");
        assert_eq!(to_snake_case("getTONAmount"), "get_ton_amount");
        assert_eq!(to_snake_case("jetton::internalTransfer"), "jetton_internal_transfer");
    }

    #[test]
    fn test_label_and_fallback() {
        let map = CodeMap::from_table([("ftTransfer", 0x0f8a7ea5)]);
        assert_eq!(map.label(0x0f8a7ea5), "ft_transfer");
        assert_eq!(map.label(4276803762), "0xfee1dead");
        assert_eq!(map.label(-14), "-0xe");
        assert!(map.get(1).is_none());
    }

    #[test]
    fn test_collision_last_write_wins() {
        let map = CodeMap::from_table([("first", 7), ("second", 7)]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.label(7), "second");
    }

    #[test]
    fn test_standard_book() {
        let book = CodeBook::standard();
        assert_eq!(book.op_label(EXCESS_OP), "excesses");
        // jetton wallet table is layered after the standard ft table
        assert_eq!(book.op_label(0x0f8a7ea5), "transfer");
        assert_eq!(book.op_label(0x25938561), "swap");
        assert_eq!(book.error_label(0), "ok");
        assert_eq!(book.error_label(-14), "out_of_gas_alt");
        assert_eq!(book.error_label(999), "0x3e7");
    }

    #[test]
    fn test_any_label() {
        let book = CodeBook::standard();
        assert_eq!(book.any_label(0x178d4519), "internal_transfer");
        assert_eq!(book.any_label(37), "not_enough_ton");
        assert_eq!(book.any_label(0xabc), "0xabc");
    }
}
