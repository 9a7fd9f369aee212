//! Ordered relocation rules for legacy armor and equipment textures.
//!
//! Each rule pairs a filename predicate with a destination builder. The
//! table is evaluated in order and the first match wins, so dispatch is
//! deterministic for any filename regardless of where in the texture tree
//! it sits. Matching is case-insensitive; destination filenames derived
//! from a material keep the original casing.

use std::path::PathBuf;

/// A file under consideration during a relocation walk.
pub struct FileContext<'a> {
    /// Filename with original casing.
    pub name: &'a str,
    /// Lowercased filename.
    pub lower: &'a str,
    /// Lowercased name of the containing directory.
    pub dir: &'a str,
}

/// One relocation rule: predicate plus destination builder.
pub struct RelocationRule {
    /// Short identifier used in logs and tests.
    pub name: &'static str,
    apply: fn(&FileContext) -> Option<PathBuf>,
}

/// The ordered rule table. First match wins.
pub const RULES: &[RelocationRule] = &[
    RelocationRule {
        name: "armor-layer-1",
        apply: armor_layer_1,
    },
    RelocationRule {
        name: "armor-layer-2",
        apply: armor_layer_2,
    },
    RelocationRule {
        name: "leather-overlay",
        apply: leather_overlay,
    },
    RelocationRule {
        name: "wolf-armor",
        apply: wolf_armor,
    },
    RelocationRule {
        name: "turtle-scute",
        apply: turtle_scute,
    },
    RelocationRule {
        name: "llama-decor",
        apply: llama_decor,
    },
    RelocationRule {
        name: "horse-armor",
        apply: horse_armor,
    },
    RelocationRule {
        name: "elytra",
        apply: elytra,
    },
];

/// Destination for `file`, relative to the pack's textures root, or `None`
/// when no rule matches.
pub fn destination_for(file: &FileContext) -> Option<(&'static str, PathBuf)> {
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(file).map(|dest| (rule.name, dest)))
}

fn equipment(subdir: &str, file_name: &str) -> PathBuf {
    ["entity", "equipment", subdir, file_name].iter().collect()
}

/// Strip `suffix` case-insensitively, requiring a non-empty remainder.
fn strip_suffix_ci<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if name.len() <= suffix.len() {
        return None;
    }
    let split = name.len() - suffix.len();
    let head = name.get(..split)?;
    let tail = name.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

fn armor_layer_1(file: &FileContext) -> Option<PathBuf> {
    let material = strip_suffix_ci(file.name, "_layer_1.png")?;
    Some(equipment("humanoid", &format!("{}.png", material)))
}

fn armor_layer_2(file: &FileContext) -> Option<PathBuf> {
    let material = strip_suffix_ci(file.name, "_layer_2.png")?;
    Some(equipment("humanoid_leggings", &format!("{}.png", material)))
}

fn leather_overlay(file: &FileContext) -> Option<PathBuf> {
    match file.lower {
        "leather_layer_1_overlay.png" => Some(equipment("humanoid", "leather_overlay.png")),
        "leather_layer_2_overlay.png" => {
            Some(equipment("humanoid_leggings", "leather_overlay.png"))
        }
        _ => None,
    }
}

fn wolf_armor(file: &FileContext) -> Option<PathBuf> {
    match file.lower {
        "wolf_armor.png" => Some(equipment("wolf_body", "armadillo_scute.png")),
        "wolf_armor_overlay.png" => Some(equipment("wolf_body", "armadillo_scute_overlay.png")),
        _ => None,
    }
}

fn turtle_scute(file: &FileContext) -> Option<PathBuf> {
    file.lower
        .starts_with("turtle_layer_1")
        .then(|| ["entity", "equipment", "turtle_scute.png"].iter().collect())
}

fn llama_decor(file: &FileContext) -> Option<PathBuf> {
    let decorated = file.lower.contains("decor") || file.dir.contains("decor");
    (file.lower.contains("llama") && decorated).then(|| equipment("llama_body", file.name))
}

fn horse_armor(file: &FileContext) -> Option<PathBuf> {
    (file.lower.contains("horse") && file.lower.contains("armor"))
        .then(|| equipment("horse_body", file.name))
}

fn elytra(file: &FileContext) -> Option<PathBuf> {
    file.lower
        .ends_with("elytra.png")
        .then(|| equipment("wings", "elytra.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(name: &str, dir: &str) -> Option<(&'static str, String)> {
        let lower = name.to_ascii_lowercase();
        let file = FileContext {
            name,
            lower: &lower,
            dir,
        };
        destination_for(&file).map(|(rule, path)| {
            let path = path
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (rule, path)
        })
    }

    #[test]
    fn test_layer_1_material() {
        assert_eq!(
            dest("iron_layer_1.png", "models"),
            Some(("armor-layer-1", "entity/equipment/humanoid/iron.png".into()))
        );
    }

    #[test]
    fn test_layer_2_material() {
        assert_eq!(
            dest("diamond_layer_2.png", "models"),
            Some((
                "armor-layer-2",
                "entity/equipment/humanoid_leggings/diamond.png".into()
            ))
        );
    }

    #[test]
    fn test_layer_match_is_case_insensitive() {
        assert_eq!(
            dest("Netherite_Layer_1.PNG", ""),
            Some((
                "armor-layer-1",
                "entity/equipment/humanoid/Netherite.png".into()
            ))
        );
    }

    #[test]
    fn test_bare_layer_suffix_is_not_a_material() {
        assert_eq!(dest("_layer_1.png", ""), None);
    }

    #[test]
    fn test_leather_overlays() {
        assert_eq!(
            dest("leather_layer_1_overlay.png", ""),
            Some((
                "leather-overlay",
                "entity/equipment/humanoid/leather_overlay.png".into()
            ))
        );
        assert_eq!(
            dest("leather_layer_2_overlay.png", ""),
            Some((
                "leather-overlay",
                "entity/equipment/humanoid_leggings/leather_overlay.png".into()
            ))
        );
    }

    #[test]
    fn test_wolf_armor_becomes_armadillo_scute() {
        assert_eq!(
            dest("wolf_armor.png", ""),
            Some((
                "wolf-armor",
                "entity/equipment/wolf_body/armadillo_scute.png".into()
            ))
        );
        assert_eq!(
            dest("wolf_armor_overlay.png", ""),
            Some((
                "wolf-armor",
                "entity/equipment/wolf_body/armadillo_scute_overlay.png".into()
            ))
        );
    }

    #[test]
    fn test_turtle_prefix() {
        assert_eq!(
            dest("turtle_layer_1_old.png", ""),
            Some(("turtle-scute", "entity/equipment/turtle_scute.png".into()))
        );
    }

    #[test]
    fn test_turtle_exact_name_hits_layer_rule_first() {
        // "turtle_layer_1.png" is also a valid layer-1 material name; the
        // earlier rule wins by table order.
        assert_eq!(
            dest("turtle_layer_1.png", ""),
            Some((
                "armor-layer-1",
                "entity/equipment/humanoid/turtle.png".into()
            ))
        );
    }

    #[test]
    fn test_llama_decor_by_filename() {
        assert_eq!(
            dest("llama_decor_red.png", "entity"),
            Some((
                "llama-decor",
                "entity/equipment/llama_body/llama_decor_red.png".into()
            ))
        );
    }

    #[test]
    fn test_llama_decor_by_directory() {
        assert_eq!(
            dest("llama_red.png", "decor"),
            Some((
                "llama-decor",
                "entity/equipment/llama_body/llama_red.png".into()
            ))
        );
        assert_eq!(dest("llama_red.png", "entity"), None);
    }

    #[test]
    fn test_horse_armor() {
        assert_eq!(
            dest("horse_armor_gold.png", ""),
            Some((
                "horse-armor",
                "entity/equipment/horse_body/horse_armor_gold.png".into()
            ))
        );
    }

    #[test]
    fn test_elytra_suffix_match() {
        let expected = Some(("elytra", "entity/equipment/wings/elytra.png".into()));
        assert_eq!(dest("elytra.png", ""), expected.clone());
        assert_eq!(dest("my_elytra.png", ""), expected);
    }

    #[test]
    fn test_unrelated_file_is_untouched() {
        assert_eq!(dest("creeper.png", "entity"), None);
        assert_eq!(dest("stone.png", "block"), None);
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                dest("diamond_layer_2.png", "a").map(|(rule, _)| rule),
                Some("armor-layer-2")
            );
        }
    }
}
