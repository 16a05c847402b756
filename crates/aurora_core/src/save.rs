//! Save files.
//!
//! A save records the galaxy seed and size plus the mutable state of every
//! empire. Terrain is never written: loading regenerates the galaxy from the
//! seed and replays exploration and colonization on top of it.
//!
//! The format is line-oriented UTF-8:
//!
//! ```text
//! AURORA_SAVE_V1
//! seed=42
//! numSystems=10
//! [Player]
//! name=Earth Empire
//! turn=3
//! currentResearch=ion_drive
//! resources=Minerals:30,Energy:150,...
//! tech=basic_mining,20,0
//! [Explored]
//! system=Sol
//! [Colonies]
//! colony=Earth;system=Sol;planet=Sol C;pop=10;mines=0;factories=0
//! [Fleets]
//! fleet=Home Defense Fleet;system=Sol
//! ship=Scout-1;class=Scout;hull=50;shields=20
//! endfleet
//! [Hostiles]
//! [Hostile]
//! name=Zorg Collective
//! contacted=1
//! atWar=1
//! ...
//! endhostile
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Unknown keys and
//! sections are skipped with a warning; a missing or wrong header aborts.

use std::path::Path;

use crate::config::GameConfig;
use crate::empire::Empire;
use crate::error::{GameError, Result};
use crate::galaxy::{Galaxy, GalaxyConfig};
use crate::game::{found_colony, Game, Hostile};
use crate::resources::{ResourceLedger, ResourceType};
use crate::ships::{Fleet, ShipClass};
use crate::shipyard;

/// First line of every save file.
pub const SAVE_HEADER: &str = "AURORA_SAVE_V1";

/// Name given to a saved hostile that records none.
pub const UNNAMED_HOSTILE: &str = "Hostile";

/// Renders a game as save text.
#[must_use]
pub fn encode(game: &Game) -> String {
    let galaxy = game.galaxy();
    let mut out = vec![
        SAVE_HEADER.to_string(),
        format!("seed={}", galaxy.seed()),
        format!("numSystems={}", galaxy.len()),
        "[Player]".to_string(),
        format!("name={}", game.player().name),
    ];
    encode_progress(game.player(), &mut out);

    out.push("[Explored]".to_string());
    out.extend(galaxy.explored_systems().map(|sys| format!("system={}", sys.name)));

    out.push("[Colonies]".to_string());
    encode_colonies(game.player(), galaxy, &mut out);
    out.push("[Fleets]".to_string());
    encode_fleets(game.player(), galaxy, &mut out);

    out.push("[Hostiles]".to_string());
    for hostile in game.hostiles() {
        out.push("[Hostile]".to_string());
        out.push(format!("name={}", hostile.empire.name));
        out.push(format!("contacted={}", u8::from(hostile.contacted)));
        out.push(format!("atWar={}", u8::from(hostile.at_war)));
        encode_progress(&hostile.empire, &mut out);
        encode_colonies(&hostile.empire, galaxy, &mut out);
        encode_fleets(&hostile.empire, galaxy, &mut out);
        out.push("endhostile".to_string());
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn encode_progress(empire: &Empire, out: &mut Vec<String>) {
    out.push(format!("turn={}", empire.turn()));
    out.push(format!(
        "currentResearch={}",
        empire.current_research().unwrap_or_default()
    ));
    let resources: Vec<String> = empire
        .resources
        .snapshot()
        .map(|(ty, amount)| format!("{}:{amount}", ty.name()))
        .collect();
    out.push(format!("resources={}", resources.join(",")));
    for tech in empire.research.technologies() {
        if tech.progress() > 0 || tech.is_researched() {
            out.push(format!(
                "tech={},{},{}",
                tech.id,
                tech.progress(),
                u8::from(tech.is_researched())
            ));
        }
    }
}

fn encode_colonies(empire: &Empire, galaxy: &Galaxy, out: &mut Vec<String>) {
    for colony in &empire.colonies {
        let system = galaxy.system(colony.system).map_or("", |sys| sys.name.as_str());
        let planet = galaxy.planet(colony.planet).map_or("", |p| p.name.as_str());
        out.push(format!(
            "colony={};system={system};planet={planet};pop={};mines={};factories={}",
            colony.name, colony.population, colony.mines, colony.factories
        ));
    }
}

fn encode_fleets(empire: &Empire, galaxy: &Galaxy, out: &mut Vec<String>) {
    for fleet in &empire.fleets {
        let system = fleet
            .location
            .and_then(|id| galaxy.system(id))
            .map_or("", |sys| sys.name.as_str());
        out.push(format!("fleet={};system={system}", fleet.name));
        for ship in &fleet.ships {
            out.push(format!(
                "ship={};class={};hull={};shields={}",
                ship.name,
                ship.class.name(),
                ship.hull(),
                ship.shields()
            ));
        }
        out.push("endfleet".to_string());
    }
}

#[derive(Debug, Default)]
struct ShipRecord {
    name: String,
    class: Option<ShipClass>,
    hull: u32,
    shields: u32,
}

#[derive(Debug, Default)]
struct FleetRecord {
    name: String,
    system: String,
    ships: Vec<ShipRecord>,
}

#[derive(Debug, Default)]
struct ColonyRecord {
    name: String,
    system: String,
    planet: String,
    population: u64,
    mines: u32,
    factories: u32,
}

#[derive(Debug, Default)]
struct EmpireRecord {
    name: Option<String>,
    turn: u32,
    current_research: Option<String>,
    resources: Vec<(ResourceType, u64)>,
    techs: Vec<(String, u32, bool)>,
    colonies: Vec<ColonyRecord>,
    fleets: Vec<FleetRecord>,
    contacted: bool,
    at_war: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Top,
    Player,
    Explored,
    Colonies,
    Fleets,
    Hostiles,
    Hostile,
    Unknown,
}

#[derive(Debug, Default)]
struct SaveRecord {
    seed: Option<u64>,
    num_systems: Option<usize>,
    player: EmpireRecord,
    explored: Vec<String>,
    hostiles: Vec<EmpireRecord>,
}

struct Parser {
    record: SaveRecord,
    section: Section,
    hostile: Option<EmpireRecord>,
    open_fleet: bool,
    line: usize,
}

impl Parser {
    /// Parses a number, keeping the caller's default when the text is bad.
    fn number<T: std::str::FromStr>(&self, key: &str, value: &str) -> Option<T> {
        let parsed = value.trim().parse().ok();
        if parsed.is_none() {
            tracing::warn!(line = self.line, key, value, "Ignoring invalid number in save");
        }
        parsed
    }

    fn flag(&self, key: &str, value: &str) -> Option<bool> {
        match value.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            other => {
                tracing::warn!(line = self.line, key, value = other, "Ignoring invalid flag in save");
                None
            }
        }
    }

    /// Empire currently receiving lines.
    fn empire(&mut self) -> &mut EmpireRecord {
        match self.hostile.as_mut() {
            Some(hostile) => hostile,
            None => &mut self.record.player,
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        if line.starts_with('[') && line.ends_with(']') {
            self.enter_section(&line[1..line.len() - 1]);
            return;
        }
        match line {
            "endfleet" => {
                self.open_fleet = false;
                return;
            }
            "endhostile" => {
                self.close_hostile();
                return;
            }
            _ => {}
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!(line = self.line, text = %line, "Skipping unrecognized save line");
            return;
        };
        match self.section {
            Section::Top => self.top_level(key, value),
            Section::Explored if key == "system" => {
                self.record.explored.push(value.trim().to_string());
            }
            Section::Player
            | Section::Colonies
            | Section::Fleets
            | Section::Hostile => self.empire_line(key, value),
            Section::Explored | Section::Hostiles | Section::Unknown => {
                tracing::warn!(line = self.line, key, "Skipping unknown save key");
            }
        }
    }

    fn enter_section(&mut self, name: &str) {
        self.open_fleet = false;
        self.section = match name {
            "Player" => Section::Player,
            "Explored" => Section::Explored,
            "Colonies" => Section::Colonies,
            "Fleets" => Section::Fleets,
            "Hostiles" => Section::Hostiles,
            "Hostile" => {
                self.close_hostile();
                self.hostile = Some(EmpireRecord::default());
                Section::Hostile
            }
            other => {
                tracing::warn!(line = self.line, section = other, "Skipping unknown save section");
                Section::Unknown
            }
        };
    }

    fn close_hostile(&mut self) {
        self.open_fleet = false;
        if let Some(hostile) = self.hostile.take() {
            self.record.hostiles.push(hostile);
        }
    }

    fn top_level(&mut self, key: &str, value: &str) {
        match key {
            "seed" => self.record.seed = self.number(key, value),
            "numSystems" => self.record.num_systems = self.number(key, value),
            _ => tracing::warn!(line = self.line, key, "Skipping unknown save key"),
        }
    }

    fn empire_line(&mut self, key: &str, value: &str) {
        match key {
            "name" => self.empire().name = Some(value.trim().to_string()),
            "turn" => {
                if let Some(turn) = self.number(key, value) {
                    self.empire().turn = turn;
                }
            }
            "currentResearch" => {
                let tech = value.trim();
                self.empire().current_research = (!tech.is_empty()).then(|| tech.to_string());
            }
            "contacted" => {
                if let Some(flag) = self.flag(key, value) {
                    self.empire().contacted = flag;
                }
            }
            "atWar" => {
                if let Some(flag) = self.flag(key, value) {
                    self.empire().at_war = flag;
                }
            }
            "resources" => {
                let resources = self.resources(value);
                self.empire().resources = resources;
            }
            "tech" => {
                if let Some(tech) = self.tech(value) {
                    self.empire().techs.push(tech);
                }
            }
            "colony" => {
                let colony = self.colony(value);
                self.empire().colonies.push(colony);
            }
            "fleet" => {
                let fields = fields(value);
                let fleet = FleetRecord {
                    name: value.split(';').next().unwrap_or_default().trim().to_string(),
                    system: fields.get("system").cloned().unwrap_or_default(),
                    ships: Vec::new(),
                };
                self.empire().fleets.push(fleet);
                self.open_fleet = true;
            }
            "ship" => {
                let ship = self.ship(value);
                let line = self.line;
                let open = self.open_fleet;
                match self.empire().fleets.last_mut() {
                    Some(fleet) if open => fleet.ships.push(ship),
                    _ => tracing::warn!(line, ship = %ship.name, "Skipping ship outside of a fleet"),
                }
            }
            _ => tracing::warn!(line = self.line, key, "Skipping unknown save key"),
        }
    }

    fn resources(&self, value: &str) -> Vec<(ResourceType, u64)> {
        let mut resources = Vec::new();
        for entry in value.split(',').filter(|entry| !entry.trim().is_empty()) {
            let Some((name, amount)) = entry.split_once(':') else {
                tracing::warn!(line = self.line, entry, "Skipping invalid resource entry");
                continue;
            };
            match ResourceType::from_name(name) {
                Some(ty) => {
                    if let Some(amount) = self.number("resources", amount) {
                        resources.push((ty, amount));
                    }
                }
                None => tracing::warn!(line = self.line, resource = name, "Skipping unknown resource"),
            }
        }
        resources
    }

    fn tech(&self, value: &str) -> Option<(String, u32, bool)> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        let [id, progress, researched] = parts.as_slice() else {
            tracing::warn!(line = self.line, value, "Skipping invalid tech entry");
            return None;
        };
        Some((
            (*id).to_string(),
            self.number("tech", progress).unwrap_or_default(),
            self.flag("tech", researched).unwrap_or_default(),
        ))
    }

    fn colony(&self, value: &str) -> ColonyRecord {
        let fields = fields(value);
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();
        let count = |key: &str| -> u32 {
            fields
                .get(key)
                .and_then(|text| self.number(key, text))
                .unwrap_or_default()
        };
        ColonyRecord {
            name: value.split(';').next().unwrap_or_default().trim().to_string(),
            system: get("system"),
            planet: get("planet"),
            population: fields
                .get("pop")
                .and_then(|text| self.number("pop", text))
                .unwrap_or_default(),
            mines: count("mines"),
            factories: count("factories"),
        }
    }

    fn ship(&self, value: &str) -> ShipRecord {
        let fields = fields(value);
        let class = match fields.get("class") {
            Some(name) => match name.parse::<ShipClass>() {
                Ok(class) => Some(class),
                Err(_) => {
                    tracing::warn!(line = self.line, class = %name, "Skipping ship of unknown class");
                    None
                }
            },
            None => None,
        };
        let stat = |key: &str| -> u32 {
            fields
                .get(key)
                .and_then(|text| self.number(key, text))
                .unwrap_or_default()
        };
        ShipRecord {
            name: value.split(';').next().unwrap_or_default().trim().to_string(),
            class,
            hull: stat("hull"),
            shields: stat("shields"),
        }
    }
}

/// `key=value` pairs after the leading name of a compound record.
fn fields(value: &str) -> std::collections::BTreeMap<String, String> {
    value
        .split(';')
        .skip(1)
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

fn parse(text: &str) -> Result<SaveRecord> {
    let mut lines = text.lines().enumerate();
    let header = lines
        .by_ref()
        .map(|(_, line)| line.trim())
        .find(|line| !line.is_empty() && !line.starts_with('#'));
    if header != Some(SAVE_HEADER) {
        return Err(GameError::InvalidSaveHeader {
            expected: SAVE_HEADER,
            found: header.map(str::to_string),
        });
    }

    let mut parser = Parser {
        record: SaveRecord::default(),
        section: Section::Top,
        hostile: None,
        open_fleet: false,
        line: 0,
    };
    for (index, line) in lines {
        parser.line = index + 1;
        parser.feed(line);
    }
    parser.close_hostile();
    Ok(parser.record)
}

/// Rebuilds a game from save text.
///
/// Settings the file does not record come from `config`.
///
/// # Errors
///
/// Returns [`GameError::InvalidSaveHeader`] if the header is missing or wrong,
/// and [`GameError::MalformedSave`] if no usable seed is recorded. Bad values
/// elsewhere are logged and left at their defaults.
pub fn decode(text: &str, mut config: GameConfig) -> Result<Game> {
    let record = parse(text)?;
    let Some(seed) = record.seed.filter(|&seed| seed != 0) else {
        return Err(GameError::MalformedSave {
            line: 0,
            message: "missing seed".to_string(),
        });
    };
    let num_systems = record.num_systems.unwrap_or(config.galaxy.num_systems);
    config.galaxy = GalaxyConfig::default()
        .with_seed(seed)
        .with_num_systems(num_systems);

    let mut galaxy = Galaxy::generate(&config.galaxy);
    for name in &record.explored {
        match galaxy.find_system_by_name(name) {
            Some(id) => {
                galaxy.explore(id);
            }
            None => tracing::warn!(system = %name, "Explored system not in galaxy"),
        }
    }

    let default_name = config.empire_name.clone();
    let player = rebuild_empire(&record.player, &default_name, &mut galaxy);
    let hostiles = record
        .hostiles
        .iter()
        .map(|entry| Hostile {
            empire: rebuild_empire(entry, UNNAMED_HOSTILE, &mut galaxy),
            contacted: entry.contacted,
            at_war: entry.at_war,
        })
        .collect();

    Ok(Game::from_parts(config, galaxy, player, hostiles))
}

fn rebuild_empire(record: &EmpireRecord, default_name: &str, galaxy: &mut Galaxy) -> Empire {
    let mut empire = Empire::new(record.name.as_deref().unwrap_or(default_name));
    empire.restore_turn(record.turn);

    let mut ledger = ResourceLedger::new();
    for &(ty, amount) in &record.resources {
        ledger.set(ty, amount);
    }
    empire.resources = ledger;

    for (id, progress, researched) in &record.techs {
        if !empire.research.restore(id, *progress, *researched) {
            tracing::warn!(empire = %empire.name, tech = %id, "Skipping unknown technology");
        }
    }
    if let Some(tech) = &record.current_research {
        if empire.set_research(tech).is_err() && !empire.restore_research(tech) {
            tracing::warn!(empire = %empire.name, tech = %tech, "Dropping invalid research selection");
        }
    }

    for colony in &record.colonies {
        let planet = galaxy
            .find_system_by_name(&colony.system)
            .and_then(|system| galaxy.find_planet(system, &colony.planet));
        let index = planet.and_then(|planet| found_colony(galaxy, &mut empire, &colony.name, planet));
        let Some(index) = index else {
            tracing::warn!(colony = %colony.name, planet = %colony.planet, "Skipping unplaceable colony");
            continue;
        };
        let rebuilt = &mut empire.colonies[index];
        rebuilt.population = colony.population;
        rebuilt.mines = colony.mines;
        rebuilt.factories = colony.factories;
    }

    for entry in &record.fleets {
        let mut fleet = Fleet::new(entry.name.clone(), empire.name.clone());
        fleet.location = galaxy.find_system_by_name(&entry.system);
        for saved in &entry.ships {
            let Some(class) = saved.class else { continue };
            if saved.hull == 0 {
                tracing::warn!(ship = %saved.name, "Skipping destroyed ship");
                continue;
            }
            let mut ship = shipyard::build_ship(saved.name.clone(), class, &empire.research);
            let damage = replay_damage(ship.max_hull(), ship.max_shields(), saved.hull, saved.shields);
            ship.take_damage(damage);
            fleet.add_ship(ship);
        }
        empire.fleets.push(fleet);
    }
    empire
}

/// Damage that takes a fresh ship to the saved hull and shields. Shields
/// drain before hull, so any hull loss implies empty shields.
fn replay_damage(max_hull: u32, max_shields: u32, hull: u32, shields: u32) -> u32 {
    let hull = hull.min(max_hull);
    if hull == max_hull {
        max_shields - shields.min(max_shields)
    } else {
        max_shields.saturating_add(max_hull - hull)
    }
}

/// Writes `game` to `path`.
///
/// # Errors
///
/// Returns [`GameError::Io`] if the file cannot be written.
pub fn write_save(game: &Game, path: &Path) -> Result<()> {
    std::fs::write(path, encode(game)).map_err(|source| GameError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), turn = game.turn(), "Game saved");
    Ok(())
}

/// Reads a game from `path`.
///
/// # Errors
///
/// Returns [`GameError::Io`] if the file cannot be read, otherwise the errors
/// of [`decode`].
pub fn read_save(path: &Path, config: GameConfig) -> Result<Game> {
    let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let game = decode(&text, config)?;
    tracing::info!(path = %path.display(), turn = game.turn(), "Game loaded");
    Ok(game)
}
