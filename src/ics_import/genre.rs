use serde::Deserialize;

/// Genre used when no keyword matches
pub const DEFAULT_GENRE: &str = "other";

/// Built-in genre table. Order is the tie-break: the first genre with a matching keyword wins.
pub const DEFAULT_GENRES: &[(&str, &[&str])] = &[
    ("house", &["house", "uk garage", "disco"]),
    ("techno", &["techno", "rave", "industrial"]),
    ("drum-and-bass", &["drum and bass", "drum & bass", "drum'n'bass", "dnb", "jungle"]),
    ("dubstep", &["dubstep", "bass music", "riddim"]),
    ("trance", &["trance", "psytrance", "goa"]),
    ("hip-hop", &["hip hop", "hip-hop", "hiphop", "rapper", "grime", "open mic cypher"]),
    ("jazz", &["jazz", "swing", "bebop", "big band"]),
    ("blues", &["blues", "rhythm and blues"]),
    ("metal", &["metal", "doom", "thrash", "hardcore"]),
    ("punk", &["punk", "oi!"]),
    ("rock", &["rock", "grunge", "garage band"]),
    ("indie", &["indie", "alternative", "shoegaze"]),
    ("folk", &["folk", "acoustic", "singer-songwriter", "bluegrass"]),
    ("country", &["country", "americana", "honky tonk"]),
    ("reggae", &["reggae", "dancehall", "dub ", "roots"]),
    ("soul", &["soul", "funk", "motown", "r&b"]),
    ("classical", &["classical", "orchestra", "symphony", "string quartet", "opera"]),
    ("pop", &["pop", "tribute", "covers band"]),
    ("electronic", &["electronic", "electronica", "edm", "synth", "dj set"]),
];

/// One genre and the keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenreRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Immutable, ordered genre keyword table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreTable {
    rules: Vec<GenreRule>,
}

impl Default for GenreTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_GENRES
                .iter()
                .map(|(name, keywords)| GenreRule {
                    name: (*name).to_string(),
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                })
                .collect(),
        )
    }
}

impl GenreTable {
    /// Build a table from rules in tie-break order. Keywords are matched case-insensitively.
    pub fn new(rules: Vec<GenreRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| GenreRule {
                name: rule.name,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Name of the first genre whose keyword occurs in `text`, or [`DEFAULT_GENRE`]
    pub fn infer(&self, text: &str) -> &str {
        let haystack = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| haystack.contains(k.as_str())))
            .map(|rule| rule.name.as_str())
            .unwrap_or(DEFAULT_GENRE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_house_is_house() {
        assert_eq!(GenreTable::default().infer("Deep House Night"), "house");
    }

    #[test]
    fn test_no_match_is_other() {
        assert_eq!(GenreTable::default().infer("Quiz Evening at the Library"), "other");
    }

    #[test]
    fn test_first_rule_wins() {
        // "techno" is listed after "house", so a text with both is house
        assert_eq!(GenreTable::default().infer("House vs Techno"), "house");
    }

    #[test]
    fn test_every_builtin_keyword_selects_its_own_genre() {
        let table = GenreTable::default();
        for (genre, keywords) in DEFAULT_GENRES {
            for keyword in *keywords {
                assert_eq!(table.infer(keyword), *genre, "keyword {:?}", keyword);
            }
        }
    }

    #[test]
    fn test_garage_band_is_rock() {
        assert_eq!(GenreTable::default().infer("Garage Band Showcase"), "rock");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let table = GenreTable::new(vec![GenreRule {
            name: "jazz".to_string(),
            keywords: vec!["BeBop".to_string()],
        }]);
        assert_eq!(table.infer("BEBOP BRUNCH"), "jazz");
    }

    #[test]
    fn test_empty_table_falls_back() {
        let table = GenreTable::new(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.infer("rock"), DEFAULT_GENRE);
    }
}
