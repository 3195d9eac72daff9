// =============================================================================
// ENGINE — D'un message de chat à la réponse texte
// =============================================================================
//
// Le pipeline d'une correspondance `#[[ ... ]]` :
//
//   texte ──parse──→ ParsedMatch ──compile──→ CompiledPlan
//                        │                        │
//                        │ (strict)               ▼
//                        └──→ Warning: ...   aggregate::execute ──→ lignes
//
// Les correspondances `[[nom]]` passent par lookup.
//
// Le moteur ne fait que des lectures ; le store lui est prêté pour la
// durée de vie du moteur. Une échéance (Deadline) couvre tout le
// traitement d'un message : une fois dépassée, chaque demande restante
// est rendue comme un échec en ligne.
//
// =============================================================================

pub mod aggregate;
pub mod format;
pub mod lookup;
pub mod trigger;

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::backend::CardStore;
use crate::config::Config;
use crate::core::compile::compile;
use crate::core::diagnose::diagnose;
use crate::core::parser::parse_match;
use crate::error::{StoreError, StoreResult};
use self::lookup::LookupRequest;

/// Échéance d'un message.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Deadline {
            expires_at: Instant::now() + budget,
        }
    }

    /// Vérifiée aux frontières d'étapes ; `stage` nomme l'étape à venir.
    pub fn check(&self, stage: &'static str) -> StoreResult<()> {
        if Instant::now() >= self.expires_at {
            Err(StoreError::DeadlineExceeded { stage })
        } else {
            Ok(())
        }
    }
}

/// Réglages du moteur, tirés de la configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Gabarit d'URL d'image (`{id}` → multiverse id)
    pub image_url: String,
    pub deadline: Duration,
    pub strict: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings::from(&Config::default())
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        EngineSettings {
            image_url: config.image_url.clone(),
            deadline: Duration::from_millis(config.deadline_ms),
            strict: config.strict,
        }
    }
}

/// Le moteur de requêtes.
pub struct Engine<'s, S: CardStore + ?Sized> {
    store: &'s S,
    settings: EngineSettings,
}

impl<'s, S: CardStore + ?Sized> Engine<'s, S> {
    pub fn new(store: &'s S, settings: EngineSettings) -> Self {
        Engine { store, settings }
    }

    /// Réponse à un message ; `None` s'il ne contient aucune correspondance.
    ///
    /// Les statistiques viennent d'abord, puis les recherches par nom,
    /// chacune dans l'ordre du message.
    pub fn respond(&self, message: &str) -> Option<String> {
        let stats = trigger::extract_stats_matches(message);
        let lookups = trigger::extract_lookup_matches(message);
        if stats.is_empty() && lookups.is_empty() {
            return None;
        }
        info!(stats = stats.len(), lookups = lookups.len(), store = self.store.name(), "message");

        let deadline = Deadline::after(self.settings.deadline);
        let mut lines = Vec::new();

        for interior in stats {
            lines.extend(self.answer_stats_within(interior, &deadline));
        }
        if !lookups.is_empty() {
            lines.extend(self.answer_lookups(&lookups));
        }

        Some(lines.join("\n"))
    }

    /// Les lignes de réponse d'une correspondance `#[[ ... ]]`.
    pub fn answer_stats(&self, interior: &str) -> Vec<String> {
        let deadline = Deadline::after(self.settings.deadline);
        self.answer_stats_within(interior, &deadline)
    }

    fn answer_stats_within(&self, interior: &str, deadline: &Deadline) -> Vec<String> {
        let parsed = parse_match(interior);

        let mut lines: Vec<String> = if self.settings.strict {
            diagnose(&parsed).iter().map(ToString::to_string).collect()
        } else {
            Vec::new()
        };

        if let Err(e) = deadline.check("compilation") {
            lines.extend(parsed.requests.iter().map(|request| {
                format!("{} {}: failed ({})", request.verb.label(), request.column, e)
            }));
            return lines;
        }

        let plan = compile(&parsed.query);
        debug!(joins = plan.join_count(), predicates = plan.predicates.len(), "plan compilé");

        let outcomes = aggregate::execute(self.store, &plan, &parsed.requests, deadline);
        lines.extend(
            outcomes
                .iter()
                .map(|outcome| format::render_outcome(outcome, &self.settings.image_url)),
        );
        lines
    }

    fn answer_lookups(&self, interiors: &[&str]) -> Vec<String> {
        let found: Vec<_> = interiors
            .iter()
            .map(|interior| {
                let request = LookupRequest::parse(interior);
                lookup::lookup(self.store, &request).unwrap_or_else(|e| {
                    warn!(name = %request.name, error = %e, "recherche en échec");
                    None
                })
            })
            .collect();
        lookup::render_lookups(&found, &self.settings.image_url)
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::sqlite::SqliteStore;
    use crate::core::card::{Card, CardSet};
    use crate::core::color::ColorMask;

    const TEMPLATE: &str = "img://{id}";

    fn mask(term: &str) -> ColorMask {
        ColorMask::parse(term).unwrap()
    }

    fn creature(id: &str, name: &str, colors: &str, cmc: f64) -> Card {
        Card::new(id, name)
            .cmc(cmc)
            .colors(mask(colors))
            .color_identity(mask(colors))
            .card_type("Creature")
            .type_line("Creature — Goblin")
            .rarity("Common")
            .multiverse_id(100 + cmc as i64)
    }

    /// Petit corpus :
    ///   - Rakdos Guildmage (BR, créature, uncommon)
    ///   - Goblin Piker (R, créature, commune) ×2 impressions
    ///   - Hill Giant (R, créature, commune)
    ///   - Drudge Skeletons (B, créature, commune)
    ///   - Shock (R, éphémère, commune)
    ///   - Forest (terrain incolore d'identité G, commune, cmc 0)
    ///   - Promo Elf (G, créature, rare, sans image)
    ///   - Colossus (artefact incolore, rare)
    fn store() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        store
            .write(|w| {
                w.insert_set(&CardSet::new("M10", "Magic 2010"))?;
                w.insert_set(&CardSet::new("M11", "Magic 2011"))?;

                w.insert_printing(
                    "M10",
                    &Card::new("g1", "Rakdos Guildmage")
                        .cmc(2.0)
                        .colors(mask("BR"))
                        .color_identity(mask("BR"))
                        .card_type("Creature")
                        .type_line("Creature — Zombie Shaman")
                        .rarity("Uncommon")
                        .multiverse_id(501)
                        .power_toughness(2, 2),
                )?;
                w.insert_printing("M10", &creature("p1", "Goblin Piker", "R", 2.0).power_toughness(2, 1))?;
                w.insert_printing(
                    "M11",
                    &creature("p2", "Goblin Piker", "R", 2.0)
                        .power_toughness(2, 1)
                        .multiverse_id(777),
                )?;
                w.insert_printing("M10", &creature("h1", "Hill Giant", "R", 4.0).power_toughness(3, 3))?;
                w.insert_printing(
                    "M10",
                    &creature("d1", "Drudge Skeletons", "B", 2.0)
                        .type_line("Creature — Skeleton")
                        .multiverse_id(301)
                        .power_toughness(1, 1),
                )?;
                w.insert_printing(
                    "M10",
                    &Card::new("s1", "Shock")
                        .cmc(1.0)
                        .colors(mask("R"))
                        .color_identity(mask("R"))
                        .card_type("Instant")
                        .type_line("Instant")
                        .rarity("Common")
                        .mana_cost(":rr:")
                        .text("Shock deals 2 damage to any target.")
                        .multiverse_id(201),
                )?;
                w.insert_printing(
                    "M10",
                    &Card::new("f1", "Forest")
                        .supertype("Basic")
                        .card_type("Land")
                        .type_line("Basic Land — Forest")
                        .color_identity(mask("G"))
                        .rarity("Common")
                        .multiverse_id(289),
                )?;
                w.insert_printing(
                    "M11",
                    &creature("e1", "Promo Elf", "G", 1.0).rarity("Rare").multiverse_id(0),
                )?;
                w.insert_printing(
                    "M11",
                    &Card::new("c1", "Colossus")
                        .cmc(8.0)
                        .card_type("Artifact")
                        .card_type("Creature")
                        .type_line("Artifact Creature — Golem")
                        .rarity("Rare")
                        .multiverse_id(601)
                        .power_toughness(10, 10),
                )?;
                w.rebuild_name_index()?;
                Ok::<_, StoreError>(())
            })
            .unwrap();
        store
    }

    fn engine(store: &SqliteStore) -> Engine<'_, SqliteStore> {
        Engine::new(
            store,
            EngineSettings {
                image_url: TEMPLATE.into(),
                deadline: Duration::from_secs(30),
                strict: false,
            },
        )
    }

    #[test]
    fn test_type_and_exact_color() {
        let store = store();
        assert_eq!(
            engine(&store).answer_stats("type:Creature,color:BR"),
            vec!["Count id: 1"]
        );
    }

    #[test]
    fn test_rarity_negation() {
        let store = store();
        // Non communes avec image : Rakdos Guildmage, Colossus
        assert_eq!(engine(&store).answer_stats("rarity:!Common"), vec!["Count id: 2"]);
    }

    #[test]
    fn test_min_cmc_names_the_card() {
        let store = store();
        assert_eq!(
            engine(&store).answer_stats("min:cmc"),
            vec!["Minimum cmc: Forest img://289"]
        );
    }

    #[test]
    fn test_max_power_on_filtered_relation() {
        let store = store();
        assert_eq!(
            engine(&store).answer_stats("type:creature,color:R,max:power"),
            vec!["Maximum power: Hill Giant img://104"]
        );
    }

    #[test]
    fn test_failure_is_inline_and_ordered() {
        let store = store();
        let lines = engine(&store).answer_stats("count:id,avg:unknownColumn");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Count id: 7");
        assert!(lines[1].starts_with("Average unknownColumn: failed ("), "{}", lines[1]);
        assert!(lines[1].contains("no such column: unknownColumn"), "{}", lines[1]);
        assert!(!lines[1].contains('\n'), "{}", lines[1]);
    }

    #[test]
    fn test_non_numeric_average_fails() {
        let store = store();
        assert_eq!(
            engine(&store).answer_stats("avg:name"),
            vec!["Average name: failed (column 'name' is not numeric)"]
        );
    }

    #[test]
    fn test_average_prints_real() {
        let store = store();
        // Rakdos Guildmage 2 + Goblin Piker 2 + Hill Giant 4 + Shock 1 = 9 / 4
        assert_eq!(
            engine(&store).answer_stats("color:R|BR,avg:cmc"),
            vec!["Average cmc: 2.250000"]
        );
    }

    #[test]
    fn test_reprints_counted_once() {
        let store = store();
        assert_eq!(engine(&store).answer_stats("name:Goblin Piker"), vec!["Count id: 1"]);
        assert_eq!(engine(&store).answer_stats("set:m11,type:Creature"), vec!["Count id: 2"]);
    }

    #[test]
    fn test_placeholder_image_excluded() {
        let store = store();
        assert_eq!(engine(&store).answer_stats("name:Promo Elf"), vec!["Count id: 0"]);
        assert_eq!(
            engine(&store).answer_stats("name:Promo Elf,sum:cmc"),
            vec!["Sum cmc: not found"]
        );
    }

    #[test]
    fn test_set_given_twice_joins_once() {
        let store = store();
        assert_eq!(engine(&store).answer_stats("set:M10,set:M11"), vec!["Count id: 7"]);
    }

    #[test]
    fn test_color_negation_excludes_exact_vector() {
        let store = store();
        // !R retire les rouges purs, garde Rakdos Guildmage (BR),
        // Drudge Skeletons (B) et Colossus
        assert_eq!(
            engine(&store).answer_stats("type:Creature,color:!R"),
            vec!["Count id: 3"]
        );
    }

    #[test]
    fn test_color_mode_black_creatures() {
        let store = store();
        // B exact : Drudge Skeletons seul, pas Rakdos Guildmage
        assert_eq!(
            engine(&store).answer_stats("type:Creature,color:B"),
            vec!["Count id: 1"]
        );
        assert_eq!(
            engine(&store).answer_stats("type:Creature,color:B|BR,avg:cmc"),
            vec!["Average cmc: 2.000000"]
        );
    }

    #[test]
    fn test_color_identity_differs_from_color() {
        let store = store();
        // Forest : incolore, identité G
        assert_eq!(engine(&store).answer_stats("colorID:G"), vec!["Count id: 1"]);
        assert_eq!(engine(&store).answer_stats("color:G"), vec!["Count id: 0"]);
        assert_eq!(
            engine(&store).answer_stats("colorID:G,min:cmc"),
            vec!["Minimum cmc: Forest img://289"]
        );
        assert_eq!(engine(&store).answer_stats("colorID:c"), vec!["Count id: 1"]);
    }

    #[test]
    fn test_colorless_term() {
        let store = store();
        assert_eq!(engine(&store).answer_stats("color:c"), vec!["Count id: 2"]);
    }

    #[test]
    fn test_subtype_contains() {
        let store = store();
        assert_eq!(engine(&store).answer_stats("subtype:goblin"), vec!["Count id: 2"]);
    }

    #[test]
    fn test_strict_mode_warns_first() {
        let store = store();
        let mut engine = engine(&store);
        engine.settings.strict = true;
        assert_eq!(
            engine.answer_stats("type:Goblin,bogus"),
            vec![
                "Warning: clause 'bogus' has no ':' and was ignored",
                "Warning: unknown type 'Goblin' was ignored",
                "Count id: 7",
            ]
        );
    }

    #[test]
    fn test_expired_deadline_renders_failure() {
        let store = store();
        let mut engine = engine(&store);
        engine.settings.deadline = Duration::ZERO;
        assert_eq!(
            engine.answer_stats("count:id,max:cmc"),
            vec![
                "Count id: failed (deadline exceeded before compilation)",
                "Maximum cmc: failed (deadline exceeded before compilation)",
            ]
        );
    }

    #[test]
    fn test_respond_without_match() {
        let store = store();
        assert_eq!(engine(&store).respond("just chatting"), None);
    }

    #[test]
    fn test_respond_multiple_matches_in_order() {
        let store = store();
        let reply = engine(&store)
            .respond("#[[type:Land]] vs #[[type:Instant]] and [[shock]]")
            .unwrap();
        assert_eq!(
            reply,
            "Count id: 1\nCount id: 1\nimg://201 :rr: ```Shock deals 2 damage to any target.``` M10"
        );
    }

    #[test]
    fn test_lookup_not_found_and_all_sets() {
        let store = store();
        let reply = engine(&store)
            .respond("[[Goblin Piker|ALL]] [[Black Lotus]]")
            .unwrap();
        assert_eq!(reply, "Goblin Piker  ``` ``` M10, M11\nCard Not Found!");
    }

    #[test]
    fn test_lookup_by_set_code() {
        let store = store();
        let reply = engine(&store).respond("[[goblin piker|m11]]").unwrap();
        assert_eq!(reply, "img://777  ``` ``` M11");
    }
}
