//! Assignment of clients to depots.
//!
//! Every depot receives the group of clients its route will serve. Two
//! strategies are available:
//! - nearest depot by direct cost
//! - clustering of the clients on their cost-to-each-depot profile, each
//!   cluster then going to the depot its centroid is closest to

use crate::error::{Error, Result};
use crate::instance::MdmtspInstance;
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Clients assigned to one depot, in client order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepotGroup {
    pub depot: usize,
    pub clients: Vec<usize>,
}

pub trait DepotPartitioner {
    /// One group per depot of the instance, in depot order. Groups may be empty.
    fn partition(&self, instance: &MdmtspInstance, rng: &mut ChaCha8Rng) -> Result<Vec<DepotGroup>>;
    fn name(&self) -> &str;
}

fn empty_groups(instance: &MdmtspInstance) -> Vec<DepotGroup> {
    instance.depots.iter()
        .map(|&depot| DepotGroup { depot, clients: Vec::new() })
        .collect()
}

/// Assigns each client to the depot with the lowest direct cost, ties going
/// to the lowest depot index.
pub struct NearestDepotPartitioner;

impl DepotPartitioner for NearestDepotPartitioner {
    fn partition(&self, instance: &MdmtspInstance, _rng: &mut ChaCha8Rng) -> Result<Vec<DepotGroup>> {
        let mut groups = empty_groups(instance);

        for &client in &instance.clients {
            let best = instance.depots.iter()
                .enumerate()
                .min_by_key(|&(_, &d)| (OrderedFloat(instance.costs.cost(client, d)), d))
                .map(|(pos, _)| pos)
                .ok_or_else(|| Error::invalid_instance("instance declares no depot"))?;
            groups[best].clients.push(client);
        }

        Ok(groups)
    }

    fn name(&self) -> &str {
        "NearestDepot"
    }
}

/// Output of a clustering run
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Cluster of every input row
    pub labels: Vec<usize>,
    /// One centroid per cluster
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances of the rows to their centroid
    pub inertia: f64,
}

/// General-purpose clustering of feature rows
pub trait Clusterer {
    fn cluster(&self, features: &[Vec<f64>], k: usize, rng: &mut ChaCha8Rng) -> Result<Clustering>;
}

/// K-Means with k-means++ seeding, keeping the lowest-inertia of `n_init` runs.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub n_init: usize,
    pub max_iterations: usize,
    /// Convergence threshold on the centroid shift, relative to the mean feature variance
    pub tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        KMeans {
            n_init: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}

impl KMeans {
    /// k-means++: each new center is drawn with probability proportional to
    /// its squared distance to the closest center chosen so far.
    fn seed_centroids(&self, features: &[Vec<f64>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
        let n = features.len();
        let mut centroids = Vec::with_capacity(k);
        centroids.push(features[rng.gen_range(0..n)].clone());

        while centroids.len() < k {
            let weights: Vec<f64> = features.iter()
                .map(|p| nearest_centroid(p, &centroids).1)
                .collect();
            let total: f64 = weights.iter().sum();

            let chosen = if total > 0.0 {
                let target = rng.gen::<f64>() * total;
                let mut acc = 0.0;
                weights.iter()
                    .position(|w| {
                        acc += w;
                        acc > target
                    })
                    .unwrap_or(n - 1)
            } else {
                rng.gen_range(0..n)
            };
            centroids.push(features[chosen].clone());
        }

        centroids
    }

    fn lloyd(&self, features: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, threshold: f64) -> Clustering {
        let dims = features[0].len();
        let mut labels = vec![0; features.len()];

        for _ in 0..self.max_iterations {
            for (label, point) in labels.iter_mut().zip(features) {
                *label = nearest_centroid(point, &centroids).0;
            }

            let mut sums = vec![vec![0.0; dims]; centroids.len()];
            let mut counts = vec![0usize; centroids.len()];
            for (&label, point) in labels.iter().zip(features) {
                counts[label] += 1;
                for (s, x) in sums[label].iter_mut().zip(point) {
                    *s += x;
                }
            }

            let mut shift = 0.0;
            for (c, centroid) in centroids.iter_mut().enumerate() {
                // An empty cluster keeps its previous centroid
                if counts[c] == 0 {
                    continue;
                }
                let updated: Vec<f64> = sums[c].iter().map(|s| s / counts[c] as f64).collect();
                shift += squared_distance(centroid, &updated);
                *centroid = updated;
            }

            if shift <= threshold {
                break;
            }
        }

        let mut inertia = 0.0;
        for (label, point) in labels.iter_mut().zip(features) {
            let (c, d) = nearest_centroid(point, &centroids);
            *label = c;
            inertia += d;
        }

        Clustering { labels, centroids, inertia }
    }
}

impl Clusterer for KMeans {
    fn cluster(&self, features: &[Vec<f64>], k: usize, rng: &mut ChaCha8Rng) -> Result<Clustering> {
        if k == 0 {
            return Err(Error::invalid_config("cluster count must be at least 1"));
        }
        if features.is_empty() {
            return Ok(Clustering { labels: Vec::new(), centroids: Vec::new(), inertia: 0.0 });
        }
        let dims = features[0].len();
        if features.iter().any(|row| row.len() != dims) {
            return Err(Error::invalid_config("feature rows have different lengths"));
        }

        let k = if k > features.len() {
            log::warn!("{} clusters requested for {} points, using {}", k, features.len(), features.len());
            features.len()
        } else {
            k
        };

        let n = features.len() as f64;
        let mean_variance = (0..dims)
            .map(|d| {
                let mean = features.iter().map(|p| p[d]).sum::<f64>() / n;
                features.iter().map(|p| (p[d] - mean).powi(2)).sum::<f64>() / n
            })
            .sum::<f64>() / dims.max(1) as f64;
        let threshold = self.tolerance * mean_variance;

        let mut best: Option<Clustering> = None;
        for _ in 0..self.n_init.max(1) {
            let centroids = self.seed_centroids(features, k, rng);
            let candidate = self.lloyd(features, centroids, threshold);
            if best.as_ref().map_or(true, |b| candidate.inertia < b.inertia) {
                best = Some(candidate);
            }
        }

        best.ok_or_else(|| Error::invalid_config("k-means produced no clustering"))
    }
}

/// Clusters the clients by their cost to every depot and hands each cluster
/// to the depot its centroid is cheapest for. Clusters that land on the same
/// depot are merged.
pub struct ClusterPartitioner<C: Clusterer = KMeans> {
    pub clusterer: C,
    /// Number of clusters; defaults to the number of depots
    pub num_clusters: Option<usize>,
}

impl ClusterPartitioner<KMeans> {
    pub fn kmeans(num_clusters: Option<usize>) -> Self {
        ClusterPartitioner {
            clusterer: KMeans::default(),
            num_clusters,
        }
    }
}

impl<C: Clusterer> ClusterPartitioner<C> {
    pub fn new(clusterer: C, num_clusters: Option<usize>) -> Self {
        ClusterPartitioner { clusterer, num_clusters }
    }
}

impl<C: Clusterer> DepotPartitioner for ClusterPartitioner<C> {
    fn partition(&self, instance: &MdmtspInstance, rng: &mut ChaCha8Rng) -> Result<Vec<DepotGroup>> {
        let k = self.num_clusters.unwrap_or(instance.num_depots());
        if k == 0 {
            return Err(Error::invalid_config("cluster count must be at least 1"));
        }

        let mut groups = empty_groups(instance);
        if instance.clients.is_empty() {
            return Ok(groups);
        }

        let features: Vec<Vec<f64>> = instance.clients.iter()
            .map(|&client| instance.depots.iter().map(|&d| instance.costs.cost(client, d)).collect())
            .collect();

        let clustering = self.clusterer.cluster(&features, k, rng)?;
        if clustering.labels.len() != features.len() {
            return Err(Error::invalid_config("clustering returned a label count that does not match the clients"));
        }

        let cluster_to_depot: Vec<usize> = clustering.centroids.iter()
            .map(|centroid| {
                centroid.iter()
                    .enumerate()
                    .min_by_key(|&(pos, &v)| (OrderedFloat(v), pos))
                    .map(|(pos, _)| pos)
                    .unwrap_or(0)
            })
            .collect();
        log::debug!(
            "cluster -> depot: {:?}",
            cluster_to_depot.iter().map(|&pos| instance.label(instance.depots[pos])).collect::<Vec<_>>()
        );

        for (&client, &label) in instance.clients.iter().zip(&clustering.labels) {
            let pos = cluster_to_depot.get(label).copied().ok_or_else(|| {
                Error::invalid_config(format!("clustering returned unknown cluster {}", label))
            })?;
            groups[pos].clients.push(client);
        }

        Ok(groups)
    }

    fn name(&self) -> &str {
        "Cluster"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::tests::SAMPLE;

    fn sample() -> MdmtspInstance {
        MdmtspInstance::parse("sample", SAMPLE, None).unwrap()
    }

    fn expected_sample_groups() -> Vec<DepotGroup> {
        vec![
            DepotGroup { depot: 0, clients: vec![2, 3] },
            DepotGroup { depot: 1, clients: vec![4, 5] },
        ]
    }

    #[test]
    fn test_nearest_depot() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let groups = NearestDepotPartitioner.partition(&sample(), &mut rng).unwrap();
        assert_eq!(groups, expected_sample_groups());
    }

    #[test]
    fn test_nearest_depot_tie_goes_to_lowest() {
        let rows = vec![
            vec![0.0, 4.0, 3.0],
            vec![4.0, 0.0, 3.0],
            vec![3.0, 3.0, 0.0],
        ];
        let instance = MdmtspInstance::from_matrix("tie", rows, 2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let groups = NearestDepotPartitioner.partition(&instance, &mut rng).unwrap();

        assert_eq!(groups[0].clients, vec![2]);
        assert!(groups[1].clients.is_empty());
    }

    #[test]
    fn test_kmeans_separates_blobs() {
        let features = vec![
            vec![0.0, 0.0], vec![0.5, 0.2], vec![0.1, 0.4],
            vec![10.0, 10.0], vec![10.3, 9.8], vec![9.9, 10.4],
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let clustering = KMeans::default().cluster(&features, 2, &mut rng).unwrap();

        assert_eq!(clustering.centroids.len(), 2);
        assert_eq!(clustering.labels[0], clustering.labels[1]);
        assert_eq!(clustering.labels[0], clustering.labels[2]);
        assert_eq!(clustering.labels[3], clustering.labels[4]);
        assert_eq!(clustering.labels[3], clustering.labels[5]);
        assert_ne!(clustering.labels[0], clustering.labels[3]);
    }

    #[test]
    fn test_kmeans_is_seeded() {
        let features: Vec<Vec<f64>> = (0..20).map(|i| vec![(i * 7 % 13) as f64, (i * 3 % 5) as f64]).collect();
        let a = KMeans::default().cluster(&features, 3, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        let b = KMeans::default().cluster(&features, 3, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();

        assert_eq!(a.labels, b.labels);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn test_kmeans_rejects_zero_clusters() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(KMeans::default().cluster(&[vec![1.0]], 0, &mut rng).is_err());
    }

    #[test]
    fn test_kmeans_more_clusters_than_points() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let clustering = KMeans::default().cluster(&[vec![1.0], vec![5.0]], 4, &mut rng).unwrap();
        assert_eq!(clustering.centroids.len(), 2);
        assert_ne!(clustering.labels[0], clustering.labels[1]);
    }

    #[test]
    fn test_cluster_partitioner_matches_nearest_on_clear_instance() {
        let mut rng = ChaCha8Rng::seed_from_u64(123);
        let groups = ClusterPartitioner::kmeans(None).partition(&sample(), &mut rng).unwrap();
        assert_eq!(groups, expected_sample_groups());
    }

    #[test]
    fn test_cluster_partitioner_assigns_every_client_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let instance = sample();
        let groups = ClusterPartitioner::kmeans(Some(3)).partition(&instance, &mut rng).unwrap();

        assert_eq!(groups.len(), instance.num_depots());
        let mut served: Vec<usize> = groups.iter().flat_map(|g| g.clients.iter().copied()).collect();
        served.sort_unstable();
        assert_eq!(served, instance.clients);
    }

    #[test]
    fn test_cluster_partitioner_zero_clusters() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = ClusterPartitioner::kmeans(Some(0)).partition(&sample(), &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_no_clients_gives_empty_groups() {
        let instance = MdmtspInstance::from_matrix("depots", vec![vec![0.0, 1.0], vec![1.0, 0.0]], 2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for groups in [
            NearestDepotPartitioner.partition(&instance, &mut rng).unwrap(),
            ClusterPartitioner::kmeans(None).partition(&instance, &mut rng).unwrap(),
        ] {
            assert_eq!(groups.len(), 2);
            assert!(groups.iter().all(|g| g.clients.is_empty()));
        }
    }
}
