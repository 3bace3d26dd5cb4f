use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use rand::Rng;
use serde::*;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::balance::update_expectations;
use crate::balance_context::BalanceContext;
use crate::error::{LoadError, RosterError};
use crate::roster::{Roster, TeamSide};

// One row of a roster file. Elo may arrive as a number or as a numeric string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub elo: u32,
}

// Fills the roster with the maximum number of players, each with a random Elo in [min_elo, max_elo].
pub fn generate_players<R: Rng + ?Sized>(roster: &mut Roster, context: &BalanceContext, rng: &mut R) {
    for i in 0..context.max_players() {
        let elo = rng.random_range(context.min_elo..=context.max_elo);
        roster.register_player(format!("Player {i}"), elo);
    }

    debug!("Generated {} players, total Elo {}", roster.players().len(), roster.total_elo());
}

/// Reads players from a `.csv` file (`name,elo` header) or a JSON array of the same records.
pub fn load_players<P: AsRef<Path>>(path: P) -> Result<Vec<PlayerRecord>, LoadError> {
    let path = path.as_ref();
    let is_csv = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_players_csv(fs::File::open(path)?)
    } else {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

pub fn read_players_csv<R: Read>(reader: R) -> Result<Vec<PlayerRecord>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        records.push(row?);
    }

    Ok(records)
}

pub fn register_players(roster: &mut Roster, records: Vec<PlayerRecord>) {
    for record in records {
        roster.register_player(record.name, record.elo);
    }
}

// Alternates red/blue in registration order, then sets the opening expectations.
pub fn setup_teams(roster: &mut Roster, context: &BalanceContext) -> Result<(), RosterError> {
    if roster.players().len() > context.max_players() {
        warn!("{} players registered, only {} fit on the two teams", roster.players().len(), context.max_players());
    }

    let mut side = TeamSide::Red;
    for id in 0..roster.players().len() {
        roster.add_player(side, id)?;
        side = side.other();
    }

    let heavy_side = roster.heavier_side();
    update_expectations(roster, heavy_side, context);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    #[test]
    fn generated_players_fit_range() {
        let context = BalanceContext::default();
        let mut roster = Roster::new(&context).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        generate_players(&mut roster, &context, &mut rng);

        assert_eq!(roster.players().len(), 16);
        assert!(roster.players().iter().all(|p| (1000..=3000).contains(&p.elo)));
        assert!(roster.players().iter().all(|p| p.team.is_none()));
    }

    #[test]
    fn same_seed_same_players() {
        let context = BalanceContext::default();
        let mut first = Roster::new(&context).unwrap();
        let mut second = Roster::new(&context).unwrap();

        generate_players(&mut first, &context, &mut StdRng::seed_from_u64(3));
        generate_players(&mut second, &context, &mut StdRng::seed_from_u64(3));

        assert_eq!(first.players(), second.players());
    }

    #[test]
    fn setup_alternates_teams() {
        let context = BalanceContext { max_team_size: 2, max_players_in_subset: 2, ..BalanceContext::default() };
        let mut roster = Roster::new(&context).unwrap();
        register_players(&mut roster, vec![
            PlayerRecord { name: "a".to_string(), elo: 1000 },
            PlayerRecord { name: "b".to_string(), elo: 1400 },
            PlayerRecord { name: "c".to_string(), elo: 1000 },
            PlayerRecord { name: "d".to_string(), elo: 1000 },
        ]);

        setup_teams(&mut roster, &context).unwrap();

        assert_eq!(roster.team(TeamSide::Red).members, vec![0, 2]);
        assert_eq!(roster.team(TeamSide::Blue).members, vec![1, 3]);
        assert_eq!(roster.team(TeamSide::Blue).expected, 91);
        assert_eq!(roster.team(TeamSide::Red).expected, 9);
    }

    #[test]
    fn setup_reports_overfull_roster() {
        let context = BalanceContext { max_team_size: 1, max_players_in_subset: 1, ..BalanceContext::default() };
        let mut roster = Roster::new(&context).unwrap();
        for i in 0..3 {
            roster.register_player(format!("p{i}"), 1500);
        }

        let err = setup_teams(&mut roster, &context).unwrap_err();
        assert!(matches!(err, RosterError::CapacityExceeded { .. }));
    }

    #[test]
    fn reads_csv_with_string_numbers() {
        let data = "name,elo\nalice, 1500\nbob,\"2100\"\n";
        let records = read_players_csv(data.as_bytes()).unwrap();

        assert_eq!(records, vec![
            PlayerRecord { name: "alice".to_string(), elo: 1500 },
            PlayerRecord { name: "bob".to_string(), elo: 2100 },
        ]);
    }

    #[test]
    fn rejects_bad_csv_rating() {
        let data = "name,elo\nalice,strong\n";
        assert!(matches!(read_players_csv(data.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn loads_json_roster() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"name": "alice", "elo": 1500}}, {{"name": "bob", "elo": "1700"}}]"#).unwrap();

        let records = load_players(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].elo, 1700);
    }

    #[test]
    fn loads_csv_roster() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "name,elo\nalice,1500\n").unwrap();

        let records = load_players(file.path()).unwrap();
        assert_eq!(records, vec![PlayerRecord { name: "alice".to_string(), elo: 1500 }]);
    }
}
