//! Maximum-weight matching on general graphs.
//!
//! Edmonds' blossom algorithm with primal-dual updates, O(V^3). Vertices are
//! dense indices `0..vertex_count`; edges carry integer weights, which may be
//! negative. With `max_cardinality` set, only maximum-cardinality matchings
//! are considered and the heaviest of those is returned.
//!
//! Weights are doubled internally so that every dual variable stays an
//! integer. The bookkeeping is done in `i128`, so any `i64` weight is
//! accepted.

const NONE: usize = usize::MAX;

/// An undirected weighted edge `(u, v, weight)`.
pub type WeightedEdge = (usize, usize, i64);

/// An edge with its weight doubled and widened.
type WideEdge = (usize, usize, i128);

/// Computes a maximum-weight matching.
///
/// Returns `mate`, where `mate[v]` is the vertex matched to `v`, or `None`
/// if `v` is single. Each vertex pair should appear at most once.
///
/// # Panics
/// Panics on a self-loop or on an endpoint `>= vertex_count`.
///
/// # Examples
/// ```
/// use pairgrid_solver::matching::max_weight_matching;
/// // A path 0 - 1 - 2 - 3 where the middle edge is the heaviest.
/// let edges = [(0, 1, 5), (1, 2, 11), (2, 3, 5)];
/// assert_eq!(
///     max_weight_matching(4, &edges, false),
///     vec![None, Some(2), Some(1), None]
/// );
/// assert_eq!(
///     max_weight_matching(4, &edges, true),
///     vec![Some(1), Some(0), Some(3), Some(2)]
/// );
/// ```
pub fn max_weight_matching(
    vertex_count: usize,
    edges: &[WeightedEdge],
    max_cardinality: bool,
) -> Vec<Option<usize>> {
    if edges.is_empty() || vertex_count == 0 {
        return vec![None; vertex_count];
    }
    for &(u, v, _) in edges {
        assert!(
            u < vertex_count && v < vertex_count && u != v,
            "invalid edge ({}, {}) for {} vertices",
            u,
            v,
            vertex_count
        );
    }
    Blossom::new(vertex_count, edges).solve(max_cardinality)
}

/// Returns the matched edges as `(u, v)` with `u < v`, in increasing order.
pub fn matched_edges(mate: &[Option<usize>]) -> Vec<(usize, usize)> {
    mate.iter()
        .enumerate()
        .filter_map(|(u, m)| m.filter(|&v| u < v).map(|v| (u, v)))
        .collect()
}

struct Blossom {
    nvertex: usize,
    edges: Vec<WideEdge>,
    /// `endpoint[p]` is the vertex at endpoint `p`; edge `k` has endpoints
    /// `2k` and `2k + 1`.
    endpoint: Vec<usize>,
    /// Remote endpoints of the edges incident to each vertex.
    neighbend: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge, or `NONE`.
    mate: Vec<usize>,
    /// 0 = free, 1 = S, 2 = T, 5 = S marked during a scan, -1 = recycled.
    label: Vec<i8>,
    labelend: Vec<usize>,
    inblossom: Vec<usize>,
    blossomparent: Vec<usize>,
    blossomchilds: Vec<Vec<usize>>,
    blossombase: Vec<usize>,
    blossomendps: Vec<Vec<usize>>,
    bestedge: Vec<usize>,
    blossombestedges: Vec<Option<Vec<usize>>>,
    unusedblossoms: Vec<usize>,
    dualvar: Vec<i128>,
    allowedge: Vec<bool>,
    queue: Vec<usize>,
}

impl Blossom {
    fn new(nvertex: usize, input: &[WeightedEdge]) -> Self {
        let edges: Vec<WideEdge> = input
            .iter()
            .map(|&(u, v, w)| (u, v, 2 * i128::from(w)))
            .collect();
        let maxweight = edges.iter().map(|e| e.2).max().unwrap_or(0).max(0);

        let mut endpoint = Vec::with_capacity(2 * edges.len());
        let mut neighbend = vec![Vec::new(); nvertex];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            endpoint.push(i);
            endpoint.push(j);
            neighbend[i].push(2 * k + 1);
            neighbend[j].push(2 * k);
        }

        let mut blossombase: Vec<usize> = (0..nvertex).collect();
        blossombase.extend(std::iter::repeat(NONE).take(nvertex));
        let mut dualvar = vec![maxweight; nvertex];
        dualvar.extend(std::iter::repeat(0).take(nvertex));

        Blossom {
            nvertex,
            endpoint,
            neighbend,
            mate: vec![NONE; nvertex],
            label: vec![0; 2 * nvertex],
            labelend: vec![NONE; 2 * nvertex],
            inblossom: (0..nvertex).collect(),
            blossomparent: vec![NONE; 2 * nvertex],
            blossomchilds: vec![Vec::new(); 2 * nvertex],
            blossombase,
            blossomendps: vec![Vec::new(); 2 * nvertex],
            bestedge: vec![NONE; 2 * nvertex],
            blossombestedges: vec![None; 2 * nvertex],
            unusedblossoms: (nvertex..2 * nvertex).collect(),
            dualvar,
            allowedge: vec![false; edges.len()],
            queue: Vec::new(),
            edges,
        }
    }

    fn slack(&self, k: usize) -> i128 {
        let (i, j, w) = self.edges[k];
        self.dualvar[i] + self.dualvar[j] - 2 * w
    }

    fn blossom_leaves(&self, b: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        self.collect_leaves(b, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, b: usize, leaves: &mut Vec<usize>) {
        if b < self.nvertex {
            leaves.push(b);
        } else {
            for &t in &self.blossomchilds[b] {
                self.collect_leaves(t, leaves);
            }
        }
    }

    /// Labels the top-level blossom containing `w` with `t`, reached through
    /// endpoint `p`. A T label propagates an S label to the mate of the base.
    fn assign_label(&mut self, w: usize, t: i8, p: usize) {
        let b = self.inblossom[w];
        debug_assert!(self.label[w] == 0 && self.label[b] == 0);
        self.label[w] = t;
        self.label[b] = t;
        self.labelend[w] = p;
        self.labelend[b] = p;
        self.bestedge[w] = NONE;
        self.bestedge[b] = NONE;
        if t == 1 {
            let leaves = self.blossom_leaves(b);
            self.queue.extend(leaves);
        } else if t == 2 {
            let base = self.blossombase[b];
            let mate_end = self.mate[base];
            debug_assert!(mate_end != NONE);
            let next = self.endpoint[mate_end];
            self.assign_label(next, 1, mate_end ^ 1);
        }
    }

    /// Traces back from `v` and `w` to find either a new blossom (returns its
    /// base) or an augmenting path (returns `NONE`).
    fn scan_blossom(&mut self, v: usize, w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NONE;
        let (mut v, mut w) = (v, w);
        while v != NONE {
            let mut b = self.inblossom[v];
            if self.label[b] == 5 {
                base = self.blossombase[b];
                break;
            }
            debug_assert_eq!(self.label[b], 1);
            path.push(b);
            self.label[b] = 5;
            if self.labelend[b] == NONE {
                v = NONE;
            } else {
                v = self.endpoint[self.labelend[b]];
                b = self.inblossom[v];
                debug_assert_eq!(self.label[b], 2);
                v = self.endpoint[self.labelend[b]];
            }
            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = 1;
        }
        base
    }

    /// Builds a new blossom with the given base through edge `k`, which
    /// connects two S vertices.
    fn add_blossom(&mut self, base: usize, k: usize) {
        let (v, w, _) = self.edges[k];
        let bb = self.inblossom[base];
        let mut bv = self.inblossom[v];
        let mut bw = self.inblossom[w];
        let b = self
            .unusedblossoms
            .pop()
            .expect("at most n/2 blossoms can be alive at once");
        self.blossombase[b] = base;
        self.blossomparent[b] = NONE;
        self.blossomparent[bb] = b;

        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossomparent[bv] = b;
            path.push(bv);
            endps.push(self.labelend[bv]);
            let next = self.endpoint[self.labelend[bv]];
            bv = self.inblossom[next];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossomparent[bw] = b;
            path.push(bw);
            endps.push(self.labelend[bw] ^ 1);
            let next = self.endpoint[self.labelend[bw]];
            bw = self.inblossom[next];
        }

        debug_assert_eq!(self.label[bb], 1);
        self.label[b] = 1;
        self.labelend[b] = self.labelend[bb];
        self.dualvar[b] = 0;
        self.blossomchilds[b] = path.clone();
        self.blossomendps[b] = endps;

        for leaf in self.blossom_leaves(b) {
            if self.label[self.inblossom[leaf]] == 2 {
                self.queue.push(leaf);
            }
            self.inblossom[leaf] = b;
        }

        // Least-slack edges from the new blossom to each neighboring S blossom.
        let mut bestedgeto = vec![NONE; 2 * self.nvertex];
        for &sub in &path {
            let nblists: Vec<Vec<usize>> = match self.blossombestedges[sub].take() {
                Some(list) => vec![list],
                None => self
                    .blossom_leaves(sub)
                    .into_iter()
                    .map(|leaf| self.neighbend[leaf].iter().map(|p| p / 2).collect())
                    .collect(),
            };
            for nblist in nblists {
                for k in nblist {
                    let (i, j, _) = self.edges[k];
                    let j = if self.inblossom[j] == b { i } else { j };
                    let bj = self.inblossom[j];
                    if bj != b
                        && self.label[bj] == 1
                        && (bestedgeto[bj] == NONE || self.slack(k) < self.slack(bestedgeto[bj]))
                    {
                        bestedgeto[bj] = k;
                    }
                }
            }
            self.bestedge[sub] = NONE;
        }

        let best: Vec<usize> = bestedgeto.into_iter().filter(|&k| k != NONE).collect();
        self.bestedge[b] = NONE;
        for &k in &best {
            if self.bestedge[b] == NONE || self.slack(k) < self.slack(self.bestedge[b]) {
                self.bestedge[b] = k;
            }
        }
        self.blossombestedges[b] = Some(best);
    }

    /// Dissolves a top-level blossom. During a stage, a T blossom being
    /// expanded has its sub-blossoms relabeled along the even path.
    fn expand_blossom(&mut self, b: usize, endstage: bool) {
        let childs = self.blossomchilds[b].clone();
        for &s in &childs {
            self.blossomparent[s] = NONE;
            if s < self.nvertex {
                self.inblossom[s] = s;
            } else if endstage && self.dualvar[s] == 0 {
                self.expand_blossom(s, endstage);
            } else {
                for leaf in self.blossom_leaves(s) {
                    self.inblossom[leaf] = s;
                }
            }
        }

        if !endstage && self.label[b] == 2 {
            let len = childs.len() as isize;
            let at = |j: isize| j.rem_euclid(len) as usize;
            let entrychild = self.inblossom[self.endpoint[self.labelend[b] ^ 1]];
            let mut j = position(&childs, entrychild) as isize;
            let (jstep, endptrick): (isize, isize) = if j & 1 == 1 {
                j -= len;
                (1, 0)
            } else {
                (-1, 1)
            };
            let trick = endptrick as usize;

            let mut p = self.labelend[b];
            while j != 0 {
                // Relabel the T sub-blossom.
                let t_vertex = self.endpoint[p ^ 1];
                self.label[t_vertex] = 0;
                let back = self.blossomendps[b][at(j - endptrick)];
                self.label[self.endpoint[back ^ trick ^ 1]] = 0;
                self.assign_label(t_vertex, 2, p);
                // Step to the next S sub-blossom.
                self.allowedge[back / 2] = true;
                j += jstep;
                p = self.blossomendps[b][at(j - endptrick)] ^ trick;
                // Step to the next T sub-blossom.
                self.allowedge[p / 2] = true;
                j += jstep;
            }

            // The base T sub-blossom keeps its mate; do not go through assign_label.
            let bv = childs[at(j)];
            let t_vertex = self.endpoint[p ^ 1];
            self.label[t_vertex] = 2;
            self.label[bv] = 2;
            self.labelend[t_vertex] = p;
            self.labelend[bv] = p;
            self.bestedge[bv] = NONE;

            j += jstep;
            while childs[at(j)] != entrychild {
                let bv = childs[at(j)];
                if self.label[bv] == 1 {
                    j += jstep;
                    continue;
                }
                let reached = self
                    .blossom_leaves(bv)
                    .into_iter()
                    .find(|&leaf| self.label[leaf] != 0);
                if let Some(v) = reached {
                    debug_assert_eq!(self.label[v], 2);
                    debug_assert_eq!(self.inblossom[v], bv);
                    self.label[v] = 0;
                    let base_mate = self.endpoint[self.mate[self.blossombase[bv]]];
                    self.label[base_mate] = 0;
                    let end = self.labelend[v];
                    self.assign_label(v, 2, end);
                }
                j += jstep;
            }
        }

        self.label[b] = -1;
        self.labelend[b] = NONE;
        self.blossomchilds[b].clear();
        self.blossomendps[b].clear();
        self.blossombase[b] = NONE;
        self.blossombestedges[b] = None;
        self.bestedge[b] = NONE;
        self.unusedblossoms.push(b);
    }

    /// Swaps matched and unmatched edges along the even path from vertex `v`
    /// to the base of blossom `b`, making `v` the new base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossomparent[t] != b {
            t = self.blossomparent[t];
        }
        if t >= self.nvertex {
            self.augment_blossom(t, v);
        }

        let len = self.blossomchilds[b].len() as isize;
        let at = |j: isize| j.rem_euclid(len) as usize;
        let i = position(&self.blossomchilds[b], t);
        let mut j = i as isize;
        let (jstep, endptrick): (isize, isize) = if j & 1 == 1 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };
        let trick = endptrick as usize;

        while j != 0 {
            j += jstep;
            let t = self.blossomchilds[b][at(j)];
            let p = self.blossomendps[b][at(j - endptrick)] ^ trick;
            if t >= self.nvertex {
                let end = self.endpoint[p];
                self.augment_blossom(t, end);
            }
            j += jstep;
            let t = self.blossomchilds[b][at(j)];
            if t >= self.nvertex {
                let end = self.endpoint[p ^ 1];
                self.augment_blossom(t, end);
            }
            let (a, c) = (self.endpoint[p], self.endpoint[p ^ 1]);
            self.mate[a] = p ^ 1;
            self.mate[c] = p;
        }

        self.blossomchilds[b].rotate_left(i);
        self.blossomendps[b].rotate_left(i);
        self.blossombase[b] = self.blossombase[self.blossomchilds[b][0]];
        debug_assert_eq!(self.blossombase[b], v);
    }

    /// Augments the matching along the path through edge `k`.
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (start, first_end) in [(v, 2 * k + 1), (w, 2 * k)] {
            let (mut s, mut p) = (start, first_end);
            loop {
                let bs = self.inblossom[s];
                debug_assert_eq!(self.label[bs], 1);
                if bs >= self.nvertex {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;
                if self.labelend[bs] == NONE {
                    // Reached a single vertex; this side of the path is done.
                    break;
                }
                let t = self.endpoint[self.labelend[bs]];
                let bt = self.inblossom[t];
                debug_assert_eq!(self.label[bt], 2);
                s = self.endpoint[self.labelend[bt]];
                let j = self.endpoint[self.labelend[bt] ^ 1];
                debug_assert_eq!(self.blossombase[bt], t);
                if bt >= self.nvertex {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.labelend[bt];
                p = self.labelend[bt] ^ 1;
            }
        }
    }

    fn solve(mut self, max_cardinality: bool) -> Vec<Option<usize>> {
        let n = self.nvertex;

        // Each stage either augments the matching or proves it maximum.
        for _ in 0..n {
            self.label.fill(0);
            self.bestedge.fill(NONE);
            for b in n..2 * n {
                self.blossombestedges[b] = None;
            }
            self.allowedge.fill(false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v] == NONE && self.label[self.inblossom[v]] == 0 {
                    self.assign_label(v, 1, NONE);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else { break };
                    debug_assert_eq!(self.label[self.inblossom[v]], 1);
                    for idx in 0..self.neighbend[v].len() {
                        let p = self.neighbend[v][idx];
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.inblossom[v] == self.inblossom[w] {
                            continue;
                        }
                        let mut kslack = 0;
                        if !self.allowedge[k] {
                            kslack = self.slack(k);
                            if kslack <= 0 {
                                self.allowedge[k] = true;
                            }
                        }
                        if self.allowedge[k] {
                            let bw_label = self.label[self.inblossom[w]];
                            if bw_label == 0 {
                                self.assign_label(w, 2, p ^ 1);
                            } else if bw_label == 1 {
                                let base = self.scan_blossom(v, w);
                                if base != NONE {
                                    self.add_blossom(base, k);
                                } else {
                                    self.augment_matching(k);
                                    augmented = true;
                                    break;
                                }
                            } else if self.label[w] == 0 {
                                self.label[w] = 2;
                                self.labelend[w] = p ^ 1;
                            }
                        } else if self.label[self.inblossom[w]] == 1 {
                            let b = self.inblossom[v];
                            if self.bestedge[b] == NONE || kslack < self.slack(self.bestedge[b]) {
                                self.bestedge[b] = k;
                            }
                        } else if self.label[w] == 0
                            && (self.bestedge[w] == NONE || kslack < self.slack(self.bestedge[w]))
                        {
                            self.bestedge[w] = k;
                        }
                    }
                }

                if augmented {
                    break;
                }

                // No augmenting path with tight edges; adjust the duals.
                let mut delta_type = 0u8;
                let mut delta = 0i128;
                let mut delta_edge = NONE;
                let mut delta_blossom = NONE;

                if !max_cardinality {
                    delta_type = 1;
                    delta = self.dualvar[..n].iter().copied().min().unwrap_or(0);
                }
                for v in 0..n {
                    if self.label[self.inblossom[v]] == 0 && self.bestedge[v] != NONE {
                        let d = self.slack(self.bestedge[v]);
                        if delta_type == 0 || d < delta {
                            delta = d;
                            delta_type = 2;
                            delta_edge = self.bestedge[v];
                        }
                    }
                }
                for b in 0..2 * n {
                    if self.blossomparent[b] == NONE && self.label[b] == 1 && self.bestedge[b] != NONE
                    {
                        let kslack = self.slack(self.bestedge[b]);
                        debug_assert_eq!(kslack % 2, 0);
                        let d = kslack / 2;
                        if delta_type == 0 || d < delta {
                            delta = d;
                            delta_type = 3;
                            delta_edge = self.bestedge[b];
                        }
                    }
                }
                for b in n..2 * n {
                    if self.blossombase[b] != NONE
                        && self.blossomparent[b] == NONE
                        && self.label[b] == 2
                        && (delta_type == 0 || self.dualvar[b] < delta)
                    {
                        delta = self.dualvar[b];
                        delta_type = 4;
                        delta_blossom = b;
                    }
                }
                if delta_type == 0 {
                    // Only reachable in max-cardinality mode: the matching is
                    // already maximum. Do a final dual update and stop.
                    delta_type = 1;
                    delta = self.dualvar[..n].iter().copied().min().unwrap_or(0).max(0);
                }

                for v in 0..n {
                    match self.label[self.inblossom[v]] {
                        1 => self.dualvar[v] -= delta,
                        2 => self.dualvar[v] += delta,
                        _ => {}
                    }
                }
                for b in n..2 * n {
                    if self.blossombase[b] != NONE && self.blossomparent[b] == NONE {
                        match self.label[b] {
                            1 => self.dualvar[b] += delta,
                            2 => self.dualvar[b] -= delta,
                            _ => {}
                        }
                    }
                }

                match delta_type {
                    1 => break,
                    2 => {
                        self.allowedge[delta_edge] = true;
                        let (i, j, _) = self.edges[delta_edge];
                        let i = if self.label[self.inblossom[i]] == 0 { j } else { i };
                        debug_assert_eq!(self.label[self.inblossom[i]], 1);
                        self.queue.push(i);
                    }
                    3 => {
                        self.allowedge[delta_edge] = true;
                        let (i, _, _) = self.edges[delta_edge];
                        debug_assert_eq!(self.label[self.inblossom[i]], 1);
                        self.queue.push(i);
                    }
                    _ => self.expand_blossom(delta_blossom, false),
                }
            }

            if !augmented {
                break;
            }

            // End of stage: expand S blossoms whose dual reached zero.
            for b in n..2 * n {
                if self.blossomparent[b] == NONE
                    && self.blossombase[b] != NONE
                    && self.label[b] == 1
                    && self.dualvar[b] == 0
                {
                    self.expand_blossom(b, true);
                }
            }
        }

        self.mate
            .iter()
            .map(|&p| (p != NONE).then(|| self.endpoint[p]))
            .collect()
    }
}

fn position(list: &[usize], item: usize) -> usize {
    list.iter()
        .position(|&x| x == item)
        .expect("sub-blossom must belong to its parent")
}
