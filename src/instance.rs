//! Module for parsing and representing MDMTSP instances.
//!
//! Instances come as AMPL data files declaring the client and depot node sets
//! and a full cost matrix:
//!
//! ```text
//! set CLIENTES := 3 4 5 ;
//! set DEPOSITOS := 1 2 ;
//! param c : 1 2 3 4 5 :=
//! 1 0 7 3 ...
//! ;
//! ```
//!
//! Node labels from the file are mapped once to dense indices (ascending label
//! order) and every algorithm works on those indices.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Node label as written in the instance file
pub type NodeLabel = u32;

/// Immutable square matrix of travel costs indexed by dense node indices.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    rows: Vec<Vec<f64>>,
    symmetric: bool,
}

impl CostMatrix {
    /// Build a matrix from its rows. Every row must have one entry per row,
    /// and every entry must be finite and non-negative.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::invalid_instance(format!(
                    "cost matrix row {} has {} entries, expected {}", i, row.len(), n
                )));
            }
            if let Some(&bad) = row.iter().find(|c| !c.is_finite() || **c < 0.0) {
                return Err(Error::invalid_instance(format!(
                    "cost matrix row {} contains invalid cost {}", i, bad
                )));
            }
        }

        let symmetric = (0..n).all(|i| (i + 1..n).all(|j| rows[i][j] == rows[j][i]));

        Ok(CostMatrix { rows, symmetric })
    }

    /// Number of nodes addressed by the matrix
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Travel cost from `i` to `j`.
    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Cost of the closed tour visiting `route` in order and returning from
    /// the last node to the first.
    ///
    /// # Panics
    ///
    /// Panics if a node index is out of range. Use [`CostMatrix::checked_route_cost`]
    /// for routes that have not been validated.
    pub fn route_cost(&self, route: &[usize]) -> f64 {
        let (first, last) = match (route.first(), route.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return 0.0,
        };

        let mut cost = 0.0;
        for pair in route.windows(2) {
            cost += self.rows[pair[0]][pair[1]];
        }
        cost + self.rows[last][first]
    }

    /// Same as [`CostMatrix::route_cost`] but reports out-of-range indices.
    pub fn checked_route_cost(&self, route: &[usize]) -> Result<f64> {
        self.check_nodes(route)?;
        Ok(self.route_cost(route))
    }

    /// Ensure every index addresses a row of the matrix
    pub fn check_nodes(&self, nodes: &[usize]) -> Result<()> {
        match nodes.iter().find(|&&n| n >= self.size()) {
            Some(&index) => Err(Error::IndexOutOfRange { index, size: self.size() }),
            None => Ok(()),
        }
    }
}

/// Represents a complete MDMTSP instance
#[derive(Debug, Clone)]
pub struct MdmtspInstance {
    /// Name of the instance (file stem when loaded from disk)
    pub name: String,
    /// Original label of every dense index, in ascending order
    pub labels: Vec<NodeLabel>,
    /// Dense indices of the depots, ascending
    pub depots: Vec<usize>,
    /// Dense indices of the clients, ascending
    pub clients: Vec<usize>,
    /// Travel costs between dense indices
    pub costs: CostMatrix,
    index: HashMap<NodeLabel, usize>,
}

/// Raw content of an AMPL data file before validation
#[derive(Debug, Default)]
struct AmplData {
    clients: Option<Vec<NodeLabel>>,
    depots: Option<Vec<NodeLabel>>,
    columns: Vec<NodeLabel>,
    rows: Vec<(NodeLabel, Vec<f64>)>,
}

impl MdmtspInstance {
    /// Build an instance from labelled rows and explicit depot/client label sets.
    /// `rows[i]` holds the costs from `labels[i]` to every label, in `labels` order.
    pub fn from_parts(
        name: &str,
        labels: Vec<NodeLabel>,
        rows: Vec<Vec<f64>>,
        depot_labels: &[NodeLabel],
        client_labels: &[NodeLabel],
    ) -> Result<Self> {
        if labels.len() != rows.len() {
            return Err(Error::invalid_instance(format!(
                "{} labels for {} matrix rows", labels.len(), rows.len()
            )));
        }

        // Dense order is ascending label order
        let mut order: Vec<usize> = (0..labels.len()).collect();
        order.sort_by_key(|&i| labels[i]);
        let sorted_labels: Vec<NodeLabel> = order.iter().map(|&i| labels[i]).collect();
        if sorted_labels.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::invalid_instance("duplicate node label in cost matrix"));
        }

        let mut dense_rows = Vec::with_capacity(rows.len());
        for &i in &order {
            if rows[i].len() != labels.len() {
                return Err(Error::invalid_instance(format!(
                    "row for node {} has {} entries, expected {}", labels[i], rows[i].len(), labels.len()
                )));
            }
            dense_rows.push(order.iter().map(|&j| rows[i][j]).collect());
        }
        let costs = CostMatrix::new(dense_rows)?;

        let index: HashMap<NodeLabel, usize> = sorted_labels.iter()
            .enumerate()
            .map(|(i, &label)| (label, i))
            .collect();

        let to_dense = |set: &[NodeLabel], what: &str| -> Result<Vec<usize>> {
            let mut dense = Vec::with_capacity(set.len());
            for label in set {
                let idx = index.get(label).copied().ok_or_else(|| {
                    Error::invalid_instance(format!("{} {} is missing from the cost matrix", what, label))
                })?;
                dense.push(idx);
            }
            dense.sort_unstable();
            dense.dedup();
            Ok(dense)
        };

        let depots = to_dense(depot_labels, "depot")?;
        let clients = to_dense(client_labels, "client")?;

        if depots.is_empty() {
            return Err(Error::invalid_instance("instance declares no depot"));
        }
        let depot_set: HashSet<usize> = depots.iter().copied().collect();
        if let Some(&both) = clients.iter().find(|c| depot_set.contains(c)) {
            return Err(Error::invalid_instance(format!(
                "node {} is declared both as client and as depot", sorted_labels[both]
            )));
        }

        Ok(MdmtspInstance {
            name: name.to_string(),
            labels: sorted_labels,
            depots,
            clients,
            costs,
            index,
        })
    }

    /// Build an instance directly from a dense matrix. Nodes are labelled
    /// `1..=n`, the first `num_depots` nodes are depots and the rest clients.
    pub fn from_matrix(name: &str, rows: Vec<Vec<f64>>, num_depots: usize) -> Result<Self> {
        let labels = sequential_labels(rows.len())?;
        let k = num_depots.min(labels.len());
        let (depots, clients) = labels.split_at(k);
        let (depots, clients) = (depots.to_vec(), clients.to_vec());
        Self::from_parts(name, labels, rows, &depots, &clients)
    }

    /// Parse an instance from AMPL data text. The node sets of the file take
    /// precedence; `num_depots` is only used when the file declares neither set,
    /// in which case the `num_depots` smallest labels are the depots.
    pub fn parse(name: &str, text: &str, num_depots: Option<usize>) -> Result<Self> {
        let data = parse_ampl(text)?;

        let row_labels: Vec<NodeLabel> = data.rows.iter().map(|(l, _)| *l).collect();
        let mut sorted_rows = row_labels.clone();
        sorted_rows.sort_unstable();
        let mut sorted_cols = data.columns.clone();
        sorted_cols.sort_unstable();
        if sorted_rows != sorted_cols {
            return Err(Error::invalid_instance("row labels of param c do not match its column labels"));
        }

        // Re-order every row into column order so that labels[i] <-> rows[i]
        let col_pos: HashMap<NodeLabel, usize> = data.columns.iter()
            .enumerate()
            .map(|(i, &l)| (l, i))
            .collect();
        let labels = data.columns.clone();
        let mut rows = vec![Vec::new(); labels.len()];
        for (label, values) in data.rows {
            rows[col_pos[&label]] = values;
        }

        let (depots, clients) = match (data.depots, data.clients) {
            (Some(d), Some(c)) => (d, c),
            (Some(d), None) => {
                let ds: HashSet<NodeLabel> = d.iter().copied().collect();
                let c = sorted_cols.iter().copied().filter(|l| !ds.contains(l)).collect();
                (d, c)
            }
            (None, Some(c)) => {
                let cs: HashSet<NodeLabel> = c.iter().copied().collect();
                let d = sorted_cols.iter().copied().filter(|l| !cs.contains(l)).collect();
                (d, c)
            }
            (None, None) => {
                let k = num_depots.ok_or_else(|| Error::invalid_instance(
                    "no DEPOSITOS/CLIENTES sets and no depot count given"
                ))?;
                if k > sorted_cols.len() {
                    return Err(Error::invalid_instance(format!(
                        "{} depots requested but the instance has {} nodes", k, sorted_cols.len()
                    )));
                }
                let (d, c) = sorted_cols.split_at(k);
                (d.to_vec(), c.to_vec())
            }
        };

        Self::from_parts(name, labels, rows, &depots, &clients)
    }

    /// Load an instance file that declares its node sets
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(path.as_ref(), None)
    }

    /// Load an instance file, falling back to `num_depots` when the file has no node sets
    pub fn from_file_with_depots<P: AsRef<Path>>(path: P, num_depots: usize) -> Result<Self> {
        Self::load(path.as_ref(), Some(num_depots))
    }

    /// Build an instance from a raw coordinate file: a header `n depots`
    /// followed by `depots + n` lines `x y`, depots first. Costs are the
    /// Euclidean distances scaled by 100 and rounded with `rounding`.
    pub fn from_coordinates(name: &str, text: &str, rounding: Rounding) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let mut header = || -> Result<usize> {
            tokens.next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| Error::invalid_instance("coordinate header must be 'clients depots'"))
        };
        let num_clients = header()?;
        let num_depots = header()?;

        let values = tokens
            .map(|t| t.parse::<f64>().map_err(|_| Error::invalid_instance(format!("invalid coordinate '{}'", t))))
            .collect::<Result<Vec<f64>>>()?;
        let dim = num_clients.checked_add(num_depots)
            .ok_or_else(|| Error::invalid_instance("coordinate header is out of range"))?;
        if values.len() / 2 < dim {
            return Err(Error::invalid_instance(format!(
                "{} coordinate pairs expected, found {}", dim, values.len() / 2
            )));
        }

        let points: Vec<(f64, f64)> = values.chunks_exact(2)
            .take(dim)
            .map(|p| (p[0], p[1]))
            .collect();
        let rows = points.iter()
            .map(|&(xi, yi)| {
                points.iter()
                    .map(|&(xj, yj)| rounding.apply(100.0 * (xi - xj).hypot(yi - yj)))
                    .collect()
            })
            .collect();

        Self::from_matrix(name, rows, num_depots)
    }

    /// Load a raw coordinate file
    pub fn from_coordinates_file<P: AsRef<Path>>(path: P, rounding: Rounding) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_coordinates(&file_stem(path), &text, rounding)
    }

    fn load(path: &Path, num_depots: Option<usize>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&file_stem(path), &text, num_depots)
    }

    /// Total number of nodes (depots and clients)
    pub fn dimension(&self) -> usize {
        self.labels.len()
    }

    pub fn num_depots(&self) -> usize {
        self.depots.len()
    }

    pub fn num_clients(&self) -> usize {
        self.clients.len()
    }

    /// Original label of a dense index
    #[inline]
    pub fn label(&self, node: usize) -> NodeLabel {
        self.labels[node]
    }

    /// Dense index of an original label
    pub fn index_of(&self, label: NodeLabel) -> Option<usize> {
        self.index.get(&label).copied()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension();
        let mut total = 0.0;
        let mut max_cost: f64 = 0.0;
        let mut pairs = 0usize;
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let c = self.costs.cost(i, j);
                    total += c;
                    max_cost = max_cost.max(c);
                    pairs += 1;
                }
            }
        }

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            num_depots: self.num_depots(),
            num_clients: self.num_clients(),
            symmetric: self.costs.is_symmetric(),
            avg_cost: if pairs > 0 { total / pairs as f64 } else { 0.0 },
            max_cost,
        }
    }
}

/// How scaled Euclidean distances become integer costs
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Rounding {
    /// Round up (the default conversion)
    Ceil,
    /// Round to the nearest integer (the `-f` instance family)
    Round,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Ceil => value.ceil(),
            Rounding::Round => value.round(),
        }
    }
}

/// Labels `1..=count`
fn sequential_labels(count: usize) -> Result<Vec<NodeLabel>> {
    let n = NodeLabel::try_from(count).map_err(|_| Error::invalid_instance(format!(
        "{} nodes exceed the label range", count
    )))?;
    Ok((1..=n).collect())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extract the depot count encoded in an instance name such as
/// `Christ100-10-f_ampl` (here 10).
pub fn depot_count_from_name(name: &str) -> Option<usize> {
    name.split('-').skip(1).find_map(|part| part.parse().ok())
}

fn parse_label(token: &str) -> Result<NodeLabel> {
    token.parse().map_err(|_| Error::invalid_instance(format!("invalid node label '{}'", token)))
}

fn parse_labels(body: &str) -> Result<Vec<NodeLabel>> {
    body.split_whitespace().map(parse_label).collect()
}

/// Split the file into `;`-terminated statements and pick out the node sets
/// and the `c` matrix. Other statements are ignored.
fn parse_ampl(text: &str) -> Result<AmplData> {
    let stripped: String = text.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    let mut data = AmplData::default();
    let mut found_matrix = false;

    for statement in stripped.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        let (header, body) = match statement.find(":=") {
            Some(pos) => (&statement[..pos], &statement[pos + 2..]),
            None => continue,
        };
        let header = header.replace(':', " : ");
        let tokens: Vec<&str> = header.split_whitespace().collect();

        match tokens.as_slice() {
            ["set", "CLIENTES"] => data.clients = Some(parse_labels(body)?),
            ["set", "DEPOSITOS"] => data.depots = Some(parse_labels(body)?),
            ["param", "c", ":", columns @ ..] => {
                data.columns = columns.iter().map(|t| parse_label(t)).collect::<Result<_>>()?;
                data.rows = parse_matrix_rows(body, data.columns.len())?;
                found_matrix = true;
            }
            _ => {}
        }
    }

    if !found_matrix {
        return Err(Error::invalid_instance("missing 'param c' cost matrix"));
    }
    if data.columns.is_empty() {
        return Err(Error::invalid_instance("cost matrix has no columns"));
    }

    Ok(data)
}

fn parse_matrix_rows(body: &str, num_columns: usize) -> Result<Vec<(NodeLabel, Vec<f64>)>> {
    let mut rows = Vec::new();
    for line in body.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts.len() != num_columns + 1 {
            return Err(Error::invalid_instance(format!(
                "cost matrix row '{}' has {} values, expected {}", parts[0], parts.len() - 1, num_columns
            )));
        }
        let label = parse_label(parts[0])?;
        let values = parts[1..].iter()
            .map(|v| v.parse::<f64>().map_err(|_| Error::invalid_instance(format!("invalid cost '{}'", v))))
            .collect::<Result<Vec<f64>>>()?;
        rows.push((label, values));
    }
    Ok(rows)
}

/// Statistics about an MDMTSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub num_depots: usize,
    pub num_clients: usize,
    pub symmetric: bool,
    pub avg_cost: f64,
    pub max_cost: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {} ({} depots + {} clients)", self.dimension, self.num_depots, self.num_clients)?;
        writeln!(f, "  Symmetric costs: {}", self.symmetric)?;
        writeln!(f, "  Avg cost: {:.2}", self.avg_cost)?;
        writeln!(f, "  Max cost: {:.2}", self.max_cost)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = "\
# two depots, four clients
set CLIENTES := 3 4 5 6 ;
set DEPOSITOS := 1 2 ;
param n := 6 ;
param c : 1 2 3 4 5 6 :=
1 0 10 1 2 9 9
2 10 0 9 9 1 2
3 1 9 0 1 8 8
4 2 9 1 0 8 8
5 9 1 8 8 0 1
6 9 2 8 8 1 0
;
";

    pub(crate) fn scenario_matrix() -> CostMatrix {
        CostMatrix::new(vec![
            vec![0.0, 2.0, 9.0, 10.0],
            vec![1.0, 0.0, 6.0, 4.0],
            vec![15.0, 7.0, 0.0, 8.0],
            vec![6.0, 3.0, 12.0, 0.0],
        ]).unwrap()
    }

    #[test]
    fn test_parse_sample() {
        let instance = MdmtspInstance::parse("sample", SAMPLE, None).unwrap();

        assert_eq!(instance.dimension(), 6);
        assert_eq!(instance.depots, vec![0, 1]);
        assert_eq!(instance.clients, vec![2, 3, 4, 5]);
        assert_eq!(instance.label(4), 5);
        assert_eq!(instance.index_of(6), Some(5));
        assert!(instance.costs.is_symmetric());
        assert_eq!(instance.costs.cost(1, 4), 1.0);
    }

    #[test]
    fn test_rows_follow_label_order() {
        // Columns and rows listed out of order must still land on the right cells
        let text = "set CLIENTES := 7 ;\nset DEPOSITOS := 3 ;\nparam c : 7 3 :=\n3 5 0\n7 0 4\n;\n";
        let instance = MdmtspInstance::parse("shuffled", text, None).unwrap();

        assert_eq!(instance.labels, vec![3, 7]);
        assert_eq!(instance.costs.cost(0, 1), 5.0);
        assert_eq!(instance.costs.cost(1, 0), 4.0);
        assert!(!instance.costs.is_symmetric());
    }

    #[test]
    fn test_depot_count_fallback() {
        let text = "param c : 1 2 3 :=\n1 0 1 2\n2 1 0 3\n3 2 3 0\n;\n";
        assert!(MdmtspInstance::parse("x", text, None).is_err());

        let instance = MdmtspInstance::parse("x", text, Some(1)).unwrap();
        assert_eq!(instance.depots, vec![0]);
        assert_eq!(instance.clients, vec![1, 2]);
    }

    #[test]
    fn test_invalid_instances() {
        let wrong_arity = "set DEPOSITOS := 1 ;\nparam c : 1 2 :=\n1 0 1\n2 1\n;\n";
        let negative = "set DEPOSITOS := 1 ;\nparam c : 1 2 :=\n1 0 -1\n2 1 0\n;\n";
        let unknown = "set DEPOSITOS := 9 ;\nparam c : 1 2 :=\n1 0 1\n2 1 0\n;\n";
        let both = "set DEPOSITOS := 1 ;\nset CLIENTES := 1 2 ;\nparam c : 1 2 :=\n1 0 1\n2 1 0\n;\n";
        let no_matrix = "set DEPOSITOS := 1 ;\n";

        for text in [wrong_arity, negative, unknown, both, no_matrix] {
            let err = MdmtspInstance::parse("bad", text, None).unwrap_err();
            assert!(matches!(err, Error::InvalidInstance(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_route_cost_closes_tour() {
        let costs = scenario_matrix();
        // 0->1 (2) + 1->3 (4) + 3->2 (12) + 2->0 (15)
        assert_eq!(costs.route_cost(&[0, 1, 3, 2]), 33.0);
        assert_eq!(costs.route_cost(&[]), 0.0);
        assert_eq!(costs.route_cost(&[2]), 0.0);
    }

    #[test]
    fn test_route_cost_reversal_symmetric() {
        let instance = MdmtspInstance::parse("sample", SAMPLE, None).unwrap();
        let route = vec![0, 3, 5, 1, 4, 2];
        let reversed: Vec<usize> = route.iter().rev().copied().collect();

        assert_eq!(instance.costs.route_cost(&route), instance.costs.route_cost(&reversed));
    }

    #[test]
    fn test_checked_route_cost() {
        let costs = scenario_matrix();
        assert_eq!(costs.checked_route_cost(&[0, 1]).unwrap(), 3.0);
        assert!(matches!(
            costs.checked_route_cost(&[0, 4]),
            Err(Error::IndexOutOfRange { index: 4, size: 4 })
        ));
    }

    #[test]
    fn test_depot_count_from_name() {
        assert_eq!(depot_count_from_name("Christ100-10-f_ampl"), Some(10));
        assert_eq!(depot_count_from_name("Gaspelle36-5"), Some(5));
        assert_eq!(depot_count_from_name("plain"), None);
    }

    #[test]
    fn test_from_coordinates_rounding() {
        // 1 client, 2 depots; scaled distances 141.42.., 150 and 269.26..
        let text = "1 2\n0 0\n1 1\n1 2.5\n";

        let ceil = MdmtspInstance::from_coordinates("c", text, Rounding::Ceil).unwrap();
        assert_eq!(ceil.depots, vec![0, 1]);
        assert_eq!(ceil.clients, vec![2]);
        assert_eq!(ceil.labels, vec![1, 2, 3]);
        assert_eq!(ceil.costs.cost(0, 1), 142.0);
        assert_eq!(ceil.costs.cost(1, 2), 150.0);
        assert_eq!(ceil.costs.cost(2, 0), 270.0);
        assert_eq!(ceil.costs.cost(2, 2), 0.0);

        let round = MdmtspInstance::from_coordinates("r", text, Rounding::Round).unwrap();
        assert_eq!(round.costs.cost(0, 1), 141.0);
        assert_eq!(round.costs.cost(1, 2), 150.0);
        assert_eq!(round.costs.cost(2, 0), 269.0);
        assert!(round.costs.is_symmetric());
    }

    #[test]
    fn test_sequential_labels() {
        assert_eq!(sequential_labels(3).unwrap(), vec![1, 2, 3]);
        assert!(sequential_labels(0).unwrap().is_empty());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_sequential_labels_overflow() {
        let too_many = NodeLabel::MAX as usize + 1;
        assert!(matches!(sequential_labels(too_many), Err(Error::InvalidInstance(_))));
    }

    #[test]
    fn test_from_coordinates_invalid() {
        assert!(MdmtspInstance::from_coordinates("x", "", Rounding::Ceil).is_err());
        assert!(MdmtspInstance::from_coordinates("x", "2 1\n0 0\n1 1\n", Rounding::Ceil).is_err());
        assert!(MdmtspInstance::from_coordinates("x", "1 1\n0 0\n1 a\n", Rounding::Ceil).is_err());
        assert!(MdmtspInstance::from_coordinates("x", "1 0\n0 0\n", Rounding::Ceil).is_err());
    }

    #[test]
    fn test_statistics() {
        let instance = MdmtspInstance::parse("sample", SAMPLE, None).unwrap();
        let stats = instance.statistics();

        assert_eq!(stats.num_depots, 2);
        assert_eq!(stats.num_clients, 4);
        assert_eq!(stats.max_cost, 10.0);
        assert!(stats.symmetric);
    }
}
