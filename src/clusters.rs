//src/clusters.rs

use ahash::AHashMap;

/// One line of an MCL output file, named by its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEntry {
    pub id: String,
    /// The line as read: tab-joined protein identifiers.
    pub members: String,
}

impl ClusterEntry {
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.split('\t')
    }

    /// Text up to the first comma or tab; the cluster's representative.
    pub fn reference(&self) -> &str {
        self.members.split(['\t', ',']).next().unwrap_or("")
    }
}

/// Functional clusters in file order, with an index from protein
/// identifier to the clusters that list it.
///
/// Entries are immutable once built. Lookups never depend on hash order:
/// the positions stored per protein are ascending, so results come back in
/// table order, with one position per occurrence of the protein.
#[derive(Debug, Default)]
pub struct ClusterTable {
    entries: Vec<ClusterEntry>,
    by_member: AHashMap<String, Vec<usize>>,
}

impl ClusterTable {
    /// Builds the table from MCL lines, naming entry `n` as `<prefix><n>`.
    pub fn from_lines<I, S>(lines: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = ClusterTable::default();

        for (idx, line) in lines.into_iter().enumerate() {
            let entry = ClusterEntry {
                id: format!("{prefix}{}", idx + 1),
                members: line.into(),
            };
            for member in entry.member_ids() {
                table
                    .by_member
                    .entry(member.to_string())
                    .or_default()
                    .push(idx);
            }
            table.entries.push(entry);
        }

        log::debug!(
            "Built cluster table: {} clusters, {} distinct members",
            table.entries.len(),
            table.by_member.len()
        );
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ClusterEntry] {
        &self.entries
    }

    /// Every cluster listing `protein`, in table order, repeated once per
    /// occurrence of the protein within a cluster.
    pub fn clusters_containing<'a>(
        &'a self,
        protein: &str,
    ) -> impl Iterator<Item = &'a ClusterEntry> + 'a {
        self.by_member
            .get(protein)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| &self.entries[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_and_one_based() {
        let table = ClusterTable::from_lines(["a\tb", "c"], "FC-");
        let ids: Vec<&str> = table.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["FC-1", "FC-2"]);
        assert_eq!(table.entries()[0].reference(), "a");
    }

    #[test]
    fn test_reference_stops_at_comma_or_tab() {
        let table = ClusterTable::from_lines(["WP_1,WP_2\tWP_3", "WP_4\tWP_5,WP_6"], "FC.");
        assert_eq!(table.entries()[0].reference(), "WP_1");
        assert_eq!(table.entries()[1].reference(), "WP_4");
        // membership stays tab-delimited
        assert_eq!(table.clusters_containing("WP_1,WP_2").count(), 1);
        assert_eq!(table.clusters_containing("WP_1").count(), 0);
    }

    #[test]
    fn test_clusters_containing_keeps_table_order_and_repeats() {
        let table = ClusterTable::from_lines(["p1\tp2", "p3", "p2\tp4\tp2"], "FC.");
        let hits: Vec<&str> = table.clusters_containing("p2").map(|e| e.id.as_str()).collect();
        assert_eq!(hits, vec!["FC.1", "FC.3", "FC.3"]);
        assert_eq!(table.clusters_containing("missing").count(), 0);
    }
}
