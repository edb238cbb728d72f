//! Edge representation

use serde::Serialize;

/// Arrow style, decided by comparing source and destination node ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Arrow {
    /// Solid arrow, source id ≤ destination id
    Forward,
    /// Dashed arrow back to an earlier node
    Backward,
}

impl Arrow {
    pub fn between(src: usize, dst: usize) -> Self {
        if src <= dst {
            Arrow::Forward
        } else {
            Arrow::Backward
        }
    }

    pub fn markup(&self) -> &'static str {
        match self {
            Arrow::Forward => "-->",
            Arrow::Backward => "-.->",
        }
    }
}

/// One rendered message
#[derive(Debug, Clone, Serialize)]
pub struct FlowEdge {
    /// Position in emission order, also the style index
    pub index: usize,
    pub arrow: Arrow,
    pub color: String,
    /// True when the excess color overrode the direction color
    pub excess: bool,
    /// `label: value` lines
    pub info: Vec<String>,
}

impl FlowEdge {
    pub fn label(&self) -> String {
        self.info.join("<br/>")
    }

    /// Edge line body, e.g. `A0 --> |index: 0|A1`
    pub fn line(&self, src: &str, dst: &str) -> String {
        format!("{} {} |{}|{}", src, self.arrow.markup(), self.label(), dst)
    }

    /// Positional style directive for this edge
    pub fn style(&self) -> String {
        format!(
            "linkStyle {} stroke:{},color:{}",
            self.index, self.color, self.color
        )
    }
}
