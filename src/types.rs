//src/types.rs

/// The three BRITE levels that follow a hierarchy title, e.g.
/// `09100 Metabolism` / `09101 Carbohydrate metabolism` / `00010 Glycolysis`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriteLevels {
    pub level1: String,
    pub level2: String,
    pub level3: String,
}

/// One row of the BRITE info output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriteRow {
    pub fc: String,
    pub key: String,
    pub levels: BriteLevels,
}

impl BriteRow {
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.fc, self.key, self.levels.level1, self.levels.level2, self.levels.level3
        )
    }
}

/// A (genome, protein) pair taken from a FASTA header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeProtein {
    pub genome: String,
    pub protein: String,
}

/// One row of the long `Genome / Protein / FC` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRow {
    pub genome: String,
    pub protein: String,
    pub fc: String,
}

impl MembershipRow {
    pub fn to_line(&self) -> String {
        format!("{}\t{}\t{}", self.genome, self.protein, self.fc)
    }
}

/// A cluster representative resolved to its amino-acid sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitRecord {
    pub fc: String,
    pub reference: String,
    pub sequence: String,
}

impl TraitRecord {
    /// Header and sequence, without a trailing newline.
    pub fn to_fasta(&self) -> String {
        format!(">{}\t{}\n{}", self.fc, self.reference, self.sequence)
    }
}
