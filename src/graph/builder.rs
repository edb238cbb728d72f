use crate::codes::{CodeBook, EXCESS_OP};
use crate::graph::actor::{Actor, ActorKey, EXTERNAL_ACTOR, NodeShape};
use crate::graph::edge::{Arrow, FlowEdge};
use crate::graph::options::{DirectionType, GraphConfig};
use crate::parser::{CaptionDecoder, CaptionParams};
use crate::trace::{EdgeRow, Sender};
use crate::units::format_coins;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Directed graph of who sent what to whom, built in trace order.
///
/// Nodes are actors in first-seen order, so a node's petgraph index is also
/// its rendered `A{id}`. Edges are messages in emission order, so an edge's
/// index is also its positional style index.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub graph: DiGraph<Actor, FlowEdge>,

    /// Latest node registered for each actor key.
    ///
    /// Under the unidirectional rule one key can own several nodes; lookups
    /// always resolve to the most recent one.
    pub actor_index: HashMap<ActorKey, NodeIndex>,

    /// Keys that have appeared as a message source
    senders: HashSet<ActorKey>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from normalized rows in a single pass
    pub fn build(rows: &[EdgeRow], config: &GraphConfig, codes: &CodeBook) -> Self {
        let mut flow = Self::new();

        for row in rows {
            let sender = match row.from {
                Some(sender) => sender,
                None if config.show_origin => Sender::External,
                None => {
                    tracing::debug!("Skipping origin transaction at lt {}", row.lt);
                    continue;
                }
            };

            let src = flow.resolve_actor(actor_key(&sender), config, false);
            let dst = flow.resolve_actor(row.to.to_string(), config, true);

            let index = flow.graph.edge_count();
            let edge = build_edge(row, index, src.index(), dst.index(), config, codes);
            flow.graph.add_edge(src, dst, edge);
        }

        flow
    }

    /// Find the node for `key`, registering a new one when needed
    fn resolve_actor(&mut self, key: ActorKey, config: &GraphConfig, is_destination: bool) -> NodeIndex {
        let reuse = match self.actor_index.get(&key) {
            Some(&idx) => {
                let only_destination = !self.senders.contains(&key);
                if is_destination
                    && only_destination
                    && config.direction_type == DirectionType::Unidirectional
                {
                    None
                } else {
                    Some(idx)
                }
            }
            None => None,
        };

        if !is_destination {
            self.senders.insert(key.clone());
        }

        match reuse {
            Some(idx) => idx,
            None => self.add_actor(key, config),
        }
    }

    fn add_actor(&mut self, key: ActorKey, config: &GraphConfig) -> NodeIndex {
        let label = if key == EXTERNAL_ACTOR {
            EXTERNAL_ACTOR.to_string()
        } else {
            config.address_map.get(&key).cloned().unwrap_or_else(|| key.clone())
        };
        let shape = config
            .shape_map
            .get(&key)
            .or_else(|| config.shape_map.get(&label))
            .copied()
            .unwrap_or(NodeShape::Square);

        let actor = Actor {
            id: self.graph.node_count(),
            key: key.clone(),
            label,
            shape,
        };
        tracing::trace!("Registered actor {} for {}", actor.node_name(), key);

        let idx = self.graph.add_node(actor);
        self.actor_index.insert(key, idx);
        idx
    }

    /// Actors in id order
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.graph.node_weights()
    }

    /// Edges in emission order with their endpoints
    pub fn edges(&self) -> impl Iterator<Item = (&Actor, &Actor, &FlowEdge)> {
        self.graph.edge_indices().filter_map(|idx| self.edge(idx))
    }

    fn edge(&self, idx: EdgeIndex) -> Option<(&Actor, &Actor, &FlowEdge)> {
        let (src, dst) = self.graph.edge_endpoints(idx)?;
        Some((&self.graph[src], &self.graph[dst], &self.graph[idx]))
    }

    /// Get the current node for an address or the `external` key
    pub fn get_actor(&self, key: &str) -> Option<&Actor> {
        self.actor_index
            .get(key)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total_actors: self.graph.node_count(),
            total_edges: self.graph.edge_count(),
            ..Default::default()
        };
        for edge in self.graph.edge_weights() {
            match edge.arrow {
                Arrow::Forward => stats.forward_edges += 1,
                Arrow::Backward => stats.backward_edges += 1,
            }
            if edge.excess {
                stats.excess_edges += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub total_actors: usize,
    pub total_edges: usize,
    pub forward_edges: usize,
    pub backward_edges: usize,
    pub excess_edges: usize,
}

fn actor_key(sender: &Sender) -> ActorKey {
    match sender {
        Sender::External => EXTERNAL_ACTOR.to_string(),
        Sender::Address(addr) => addr.to_string(),
    }
}

fn build_edge(
    row: &EdgeRow,
    index: usize,
    src_id: usize,
    dst_id: usize,
    config: &GraphConfig,
    codes: &CodeBook,
) -> FlowEdge {
    let arrow = Arrow::between(src_id, dst_id);
    let excess = row.op == Some(EXCESS_OP);
    let color = if excess {
        &config.color_excess
    } else {
        match arrow {
            Arrow::Forward => &config.color_forward,
            Arrow::Backward => &config.color_backward,
        }
    };

    FlowEdge {
        index,
        arrow,
        color: color.clone(),
        excess,
        info: edge_info(row, index, config, codes),
    }
}

/// Label lines in their fixed order, filtered by the display toggles
fn edge_info(row: &EdgeRow, index: usize, config: &GraphConfig, codes: &CodeBook) -> Vec<String> {
    let hide = config.hide_ok_values;
    let mut info = Vec::new();
    let mut add = |label: &str, data: &dyn std::fmt::Display| info.push(format!("{}: {}", label, data));

    if config.display_index {
        add("index", &index);
    }

    if config.display_value
        && let Some(value) = row.value
    {
        add("value", &format_coins(value));
    }

    if config.display_fees {
        match config.fee_details.components() {
            Some(enabled) => {
                let fees = &row.fees;
                let components = [
                    ("computeFee", enabled.compute_fee, fees.compute_fee),
                    ("storageFee", enabled.storage_fee, fees.storage_fee),
                    ("totalFwdFee", enabled.total_fwd_fee, fees.total_fwd_fee),
                    ("inForwardFee", enabled.in_forward_fee, fees.in_forward_fee),
                    ("totalActionFee", enabled.total_action_fee, fees.total_action_fee),
                ];
                for (label, on, fee) in components {
                    if let Some(fee) = fee
                        && on
                        && (!hide || fee != 0)
                    {
                        add(label, &format_coins(fee));
                    }
                }
            }
            None => add("fees", &format_coins(row.total_fees)),
        }
    }

    if config.display_op
        && let Some(op) = row.op
    {
        add("op", &codes.op_label(op));
    }

    if config.display_tokens
        && let (Some(op), Some(body)) = (row.op, row.body.as_ref())
        && let Some(handler) = config.captions.get(op)
    {
        let params = CaptionParams {
            body,
            codes,
            hide_ok_values: hide,
        };
        match handler.decode(&params) {
            Ok(captions) => {
                for (label, value) in captions.iter() {
                    add(label, &value);
                }
            }
            Err(e) => tracing::debug!("No captions for edge {}: {}", index, e),
        }
    }

    if config.display_exit_code
        && let Some(code) = row.exit_code
        && (!hide || code != 0)
    {
        add("exit", &codes.error_label(code));
    }

    if config.display_action_result
        && let Some(code) = row.action_result_code
        && (!hide || code != 0)
    {
        add("action", &codes.error_label(code));
    }

    if config.display_deploy && (!hide || row.deploy) {
        add("deploy", &row.deploy);
    }

    if config.display_aborted
        && let Some(aborted) = row.aborted
        && (!hide || aborted)
    {
        add("abort", &aborted);
    }

    if config.display_destroyed
        && let Some(destroyed) = row.destroyed
        && (!hide || destroyed)
    {
        add("destroy", &destroyed);
    }

    if config.display_success
        && let Some(success) = row.success
        && (!hide || success)
    {
        add("success", &success);
    }

    info
}
