//! Built-in filterable stats and the aliases each is known by.
//!
//! Codes follow the game's property table. Aliases cover the alternate codes
//! used by the item stat table, community filter syntax, and older table
//! revisions. Descriptions use `#` where the rolled value is shown.

use crate::types::{StatCategory, StatCode};

/// A built-in stat definition.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinStat {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: StatCategory,
    pub aliases: &'static [&'static str],
    pub is_variable: bool,
}

impl BuiltinStat {
    pub fn to_stat_code(&self) -> StatCode {
        StatCode {
            code: self.code.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category,
            aliases: self.aliases.iter().map(|a| a.to_string()).collect(),
            is_variable: self.is_variable,
        }
    }
}

const fn stat(
    code: &'static str,
    name: &'static str,
    description: &'static str,
    category: StatCategory,
    aliases: &'static [&'static str],
    is_variable: bool,
) -> BuiltinStat {
    BuiltinStat {
        code,
        name,
        description,
        category,
        aliases,
        is_variable,
    }
}

use StatCategory::*;

/// Stats every catalog starts with.
pub const BUILTIN_STATS: &[BuiltinStat] = &[
    // Skills
    stat("allskills", "All Skills", "+# To All Skills", Skills, &["item_allskills", "all-skills"], true),
    stat("ama", "Amazon Skills", "+# To Amazon Skill Levels", Skills, &["amazon"], true),
    stat("sor", "Sorceress Skills", "+# To Sorceress Skill Levels", Skills, &["sorceress"], true),
    stat("nec", "Necromancer Skills", "+# To Necromancer Skill Levels", Skills, &["necromancer"], true),
    stat("pal", "Paladin Skills", "+# To Paladin Skill Levels", Skills, &["paladin"], true),
    stat("bar", "Barbarian Skills", "+# To Barbarian Skill Levels", Skills, &["barbarian"], true),
    stat("dru", "Druid Skills", "+# To Druid Skill Levels", Skills, &["druid"], true),
    stat("ass", "Assassin Skills", "+# To Assassin Skill Levels", Skills, &["assassin"], true),
    // Offense
    stat("att", "Attack Rating", "+# To Attack Rating", Offense, &["tohit", "item_tohit", "ar"], true),
    stat("att%", "Attack Rating %", "#% Bonus To Attack Rating", Offense, &["item_tohit_percent", "ar%"], true),
    stat("dmg%", "Enhanced Damage", "#% Enhanced Damage", Offense, &["ed", "item_maxdamage_percent"], true),
    stat("dmg-min", "Minimum Damage", "+# To Minimum Damage", Offense, &["mindamage", "min-dmg"], true),
    stat("dmg-max", "Maximum Damage", "+# To Maximum Damage", Offense, &["maxdamage", "max-dmg"], true),
    stat("swing2", "Increased Attack Speed", "#% Increased Attack Speed", Offense, &["ias", "swing1", "swing3", "item_fasterattackrate"], true),
    stat("cast2", "Faster Cast Rate", "#% Faster Cast Rate", Offense, &["fcr", "cast1", "cast3", "item_fastercastrate"], true),
    stat("crush", "Crushing Blow", "#% Chance Of Crushing Blow", Offense, &["cb", "item_crushingblow"], true),
    stat("deadly", "Deadly Strike", "#% Deadly Strike", Offense, &["ds", "item_deadlystrike"], true),
    stat("openwounds", "Open Wounds", "#% Chance Of Open Wounds", Offense, &["ow", "item_openwounds"], true),
    stat("lifesteal", "Life Stolen Per Hit", "#% Life Stolen Per Hit", Offense, &["ll", "lifedrainmindam"], true),
    stat("manasteal", "Mana Stolen Per Hit", "#% Mana Stolen Per Hit", Offense, &["ml", "manadrainmindam"], true),
    stat("ignore-ac", "Ignore Target's Defense", "Ignore Target's Defense", Offense, &["itd", "item_ignoretargetac"], false),
    stat("pierce", "Pierce", "#% Chance To Pierce", Offense, &["item_pierce"], true),
    stat("noheal", "Prevent Monster Heal", "Prevent Monster Heal", Offense, &["pmh", "item_preventheal"], false),
    stat("pierce-fire", "Fire Pierce", "-#% To Enemy Fire Resistance", Offense, &["passive_fire_pierce"], true),
    stat("pierce-cold", "Cold Pierce", "-#% To Enemy Cold Resistance", Offense, &["passive_cold_pierce"], true),
    stat("pierce-ltng", "Lightning Pierce", "-#% To Enemy Lightning Resistance", Offense, &["passive_ltng_pierce"], true),
    stat("pierce-pois", "Poison Pierce", "-#% To Enemy Poison Resistance", Offense, &["passive_pois_pierce"], true),
    // Defense
    stat("ac", "Defense", "+# Defense", Defense, &["armorclass", "def"], true),
    stat("ac%", "Enhanced Defense", "#% Enhanced Defense", Defense, &["item_armor_percent", "edef"], true),
    stat("balance2", "Faster Hit Recovery", "#% Faster Hit Recovery", Defense, &["fhr", "balance1", "balance3", "item_fastergethitrate"], true),
    stat("block2", "Faster Block Rate", "#% Faster Block Rate", Defense, &["fbr", "block1", "block3", "item_fasterblockrate"], true),
    stat("block", "Increased Chance Of Blocking", "#% Increased Chance Of Blocking", Defense, &["toblock", "item_toblock"], true),
    stat("red-dmg%", "Damage Reduced", "Damage Reduced By #%", Defense, &["dr", "damageresist"], true),
    stat("red-mag", "Magic Damage Reduced", "Magic Damage Reduced By #", Defense, &["mdr", "magic_damage_reduction"], true),
    stat("nofreeze", "Cannot Be Frozen", "Cannot Be Frozen", Defense, &["cbf", "item_cannotbefrozen"], false),
    // Resistance
    stat("res-all", "All Resistances", "All Resistances +#", Resistance, &["allres", "all-res"], true),
    stat("res-fire", "Fire Resist", "Fire Resist +#%", Resistance, &["fireresist", "fres"], true),
    stat("res-cold", "Cold Resist", "Cold Resist +#%", Resistance, &["coldresist", "cres"], true),
    stat("res-ltng", "Lightning Resist", "Lightning Resist +#%", Resistance, &["lightresist", "lres"], true),
    stat("res-pois", "Poison Resist", "Poison Resist +#%", Resistance, &["poisonresist", "pres"], true),
    // Attributes
    stat("str", "Strength", "+# To Strength", Attributes, &["strength"], true),
    stat("dex", "Dexterity", "+# To Dexterity", Attributes, &["dexterity"], true),
    stat("vit", "Vitality", "+# To Vitality", Attributes, &["vitality"], true),
    stat("enr", "Energy", "+# To Energy", Attributes, &["energy"], true),
    stat("all-stats", "All Attributes", "+# To All Attributes", Attributes, &["allstats"], true),
    stat("hp", "Life", "+# To Life", Attributes, &["maxhp", "life"], true),
    stat("mana", "Mana", "+# To Mana", Attributes, &["maxmana"], true),
    // Utility
    stat("mf", "Magic Find", "#% Better Chance Of Getting Magic Items", Utility, &["mag%", "item_magicbonus"], true),
    stat("gold%", "Gold Find", "#% Extra Gold From Monsters", Utility, &["gf", "item_goldbonus"], true),
    stat("move2", "Faster Run/Walk", "#% Faster Run/Walk", Utility, &["frw", "move1", "move3", "item_fastermovevelocity"], true),
    stat("regen", "Replenish Life", "Replenish Life +#", Utility, &["hpregen"], true),
    stat("regen-mana", "Regenerate Mana", "Regenerate Mana #%", Utility, &["manarecoverybonus"], true),
    stat("indestruct", "Indestructible", "Indestructible", Utility, &["item_indesctructible"], false),
    stat("sock", "Sockets", "Socketed (#)", Utility, &["item_numsockets", "sockets"], true),
    stat("ease", "Requirements", "Requirements -#%", Utility, &["item_req_percent"], true),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn codes_are_unique() {
        let mut seen = HashSet::new();
        for s in BUILTIN_STATS {
            assert!(seen.insert(s.code), "duplicate code {}", s.code);
        }
    }

    #[test]
    fn aliases_map_to_exactly_one_code() {
        let codes: HashSet<_> = BUILTIN_STATS.iter().map(|s| s.code).collect();
        let mut seen = HashSet::new();
        for s in BUILTIN_STATS {
            for alias in s.aliases {
                assert!(!codes.contains(alias), "alias {alias} shadows a code");
                assert!(seen.insert(*alias), "alias {alias} used twice");
            }
        }
    }

    #[test]
    fn magic_find_alias() {
        let mf = BUILTIN_STATS.iter().find(|s| s.code == "mf").unwrap();
        assert!(mf.aliases.contains(&"mag%"));
    }
}
