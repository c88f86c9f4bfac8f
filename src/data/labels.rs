//! Human-readable names for series codes.

/// Code → label lookup. Unknown codes have no label.
pub trait Labels: Sync {
    fn label(&self, code: &str) -> Option<&str>;

    /// Label, or the code itself when none is known.
    fn label_or_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.label(code).unwrap_or(code)
    }
}

/// A fixed table compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct StaticLabels(&'static [(&'static str, &'static str)]);

impl StaticLabels {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self(entries)
    }
}

impl Labels for StaticLabels {
    fn label(&self, code: &str) -> Option<&str> {
        self.0.iter().find(|(c, _)| *c == code).map(|(_, l)| *l)
    }
}

/// CPI sub-index labels (main groups plus frequently inspected items).
pub const CPI_LABELS: StaticLabels = StaticLabels::new(&[
    ("IS00", "Vísitala neysluverðs"),
    ("IS01", "Matur og drykkjarvörur"),
    ("IS02", "Áfengi og tóbak"),
    ("IS03", "Föt og skór"),
    ("IS04", "Húsnæði, hiti og rafmagn"),
    ("IS0451", "Rafmagn"),
    ("IS05", "Húsgögn, heimilisbúnaður o.fl."),
    ("IS06", "Heilsa"),
    ("IS07", "Ferðir og flutningar"),
    ("IS07224", "Dísel"),
    ("IS08", "Póstur og sími"),
    ("IS09", "Tómstundir og menning"),
    ("IS09111", "Sjónvörp, útvörp og myndspilarar"),
    ("IS10", "Menntun"),
    ("IS11", "Hótel og veitingastaðir"),
    ("IS12", "Aðrar vörur og þjónusta"),
]);

pub const PPI_LABELS: StaticLabels = StaticLabels::new(&[
    ("PPI", "Vísitala framleiðsluverðs"),
    ("Marine", "Sjávarafurðir"),
    ("Metal", "Stóriðja"),
    ("Food", "Matvæli"),
    ("Other", "Annar iðnaður"),
    ("Prod_dom", "Afurðir seldar innanlands"),
    ("Prod_exp", "Útfluttar afurðir"),
    ("Prod_exp_exMarine", "Útfluttar afurðir án sjávarafurða"),
]);

/// The construction table publishes no category names; its codes label themselves.
pub const CONSTRUCTION_LABELS: StaticLabels = StaticLabels::new(&[]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels() {
        assert_eq!(CPI_LABELS.label("IS09111"), Some("Sjónvörp, útvörp og myndspilarar"));
        assert_eq!(CPI_LABELS.label("IS07224"), Some("Dísel"));
        assert_eq!(CPI_LABELS.label("EitthvaðRugl"), None);
        assert_eq!(PPI_LABELS.label("Marine"), Some("Sjávarafurðir"));
    }

    #[test]
    fn falls_back_to_code() {
        assert_eq!(PPI_LABELS.label_or_code("Unknown"), "Unknown");
        assert_eq!(CONSTRUCTION_LABELS.label_or_code("Carp"), "Carp");
    }

    #[test]
    fn tables_are_well_formed() {
        for table in [CPI_LABELS, PPI_LABELS] {
            for (code, label) in table.0 {
                assert!(!code.is_empty());
                assert!(!label.trim().is_empty());
            }
        }
        for (code, _) in CPI_LABELS.0 {
            assert!(code.starts_with("IS"));
        }
    }
}
