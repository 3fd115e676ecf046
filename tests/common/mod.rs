#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// A small but representative dual-document save: metadata header, two bases,
/// mixed research/production states, one facility under construction.
pub const SAMPLE_SAVE: &str = concat!(
    "name: Operation Hammerfall\n",
    "version: 7.1.4\n",
    "engine: OpenXcom\n",
    "mods:\n",
    "- XComFiles\n",
    "- TechComm\n",
    "---\n",
    "difficulty: 2\n",
    "monthsPassed: 5\n",
    "daysPassed: 154\n",
    "time:\n",
    "  second: 12\n",
    "  minute: 30\n",
    "  hour: 14\n",
    "  day: 3\n",
    "  month: 6\n",
    "  year: 1999\n",
    "funds:\n",
    "- 2696270\n",
    "- 454802\n",
    "bases:\n",
    "- name: Omega\n",
    "  facilities:\n",
    "  - type: STR_ACCESS_LIFT\n",
    "    x: 2\n",
    "    y: 2\n",
    "  - type: STR_LABORATORY\n",
    "    x: 3\n",
    "    y: 2\n",
    "    buildTime: 48\n",
    "  soldiers:\n",
    "  - name: Vera Kowalski\n",
    "    rank: 3\n",
    "    missions: 12\n",
    "    kills: 9\n",
    "    currentStats:\n",
    "      tu: 60\n",
    "      stamina: 70\n",
    "      health: 40\n",
    "      bravery: 60\n",
    "      reactions: 55\n",
    "      firing: 72\n",
    "      throwing: 58\n",
    "      strength: 35\n",
    "      psiStrength: 46\n",
    "      psiSkill: 0\n",
    "      melee: 61\n",
    "      mana: 0\n",
    "    initialStats:\n",
    "      tu: 50\n",
    "      health: 35\n",
    "  research:\n",
    "  - project: STR_LASER_WEAPONS\n",
    "    assigned: 10\n",
    "    spent: 30\n",
    "    cost: 100\n",
    "  - project: STR_MOTION_SCANNER\n",
    "    assigned: 0\n",
    "    spent: 12\n",
    "    cost: 110\n",
    "  - project: STR_ALIEN_ALLOYS\n",
    "    spent: 80\n",
    "    cost: 80\n",
    "  productions:\n",
    "  - item: STR_LASER_CANNON\n",
    "    assigned: 20\n",
    "    spent: 15\n",
    "    amount: 4\n",
    "  items:\n",
    "    STR_RIFLE: 5\n",
    "    STR_RIFLE_CLIP: 18\n",
    "    STR_GRENADE: 12\n",
    "- name: Talon\n",
    "  facilities:\n",
    "  - type: STR_ACCESS_LIFT\n",
    "    x: 2\n",
    "    y: 2\n",
    "  research:\n",
    "  - project: STR_PERSONAL_ARMOR\n",
    "    assigned: 4\n",
    "    spent: 5\n",
    "    cost: 90\n",
    "  - project: STR_PLASMA_RIFLE\n",
    "    spent: 700\n",
    "    cost: 700\n",
    "  productions:\n",
    "  - item: STR_ALLOY_AMMO\n",
    "    assigned: 5\n",
    "    spent: 30\n",
    "    infinite: true\n",
    "  items:\n",
    "    STR_RIFLE: 2\n",
);

/// Write the sample save into `dir` and return its path.
pub fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("SaveGame.sav");
    std::fs::write(&path, SAMPLE_SAVE).expect("write sample save");
    path
}
