use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::modules::helpers::points::PointsTable;
use crate::modules::models::race_result::ResultRow;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DriverStanding {
    pub id: i32,
    pub name: String,
    pub primary_team_id: Option<i32>,
    pub primary_team_name: Option<String>,
    pub total_points: u64,
    pub results_count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub id: i32,
    pub name: String,
    pub total_points: u64,
    pub drivers_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DriverDetail {
    pub result_id: i32,
    pub map_name: String,
    pub team_name: Option<String>,
    pub place: i32,
    pub time_ms: Option<i64>,
    pub points_awarded: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastTeam {
    pub result_id: i32,
    pub team_id: Option<i32>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub driver_standings: Vec<DriverStanding>,
    pub team_standings: Vec<TeamStanding>,
}

/// how often a driver raced for one team
#[derive(Debug)]
struct TeamHit {
    team_id: i32,
    name: String,
    count: u32,
}

#[derive(Debug)]
struct DriverRecord {
    id: i32,
    name: String,
    total_points: u64,
    results_count: u32,
    // kept in first-seen order
    team_hits: Vec<TeamHit>,
}

impl DriverRecord {
    fn record_team(&mut self, team_id: i32, name: &str) {
        match self.team_hits.iter_mut().find(|hit| hit.team_id == team_id) {
            Some(hit) => hit.count += 1,
            None => self.team_hits.push(TeamHit {
                team_id,
                name: name.to_string(),
                count: 1,
            }),
        }
    }

    /// the most used team. on a tie the team that was seen first wins.
    fn primary_team(&self) -> Option<&TeamHit> {
        let mut best: Option<&TeamHit> = None;
        for hit in &self.team_hits {
            if best.map_or(true, |b| hit.count > b.count) {
                best = Some(hit);
            }
        }

        best
    }

    fn into_standing(self) -> DriverStanding {
        let (primary_team_id, primary_team_name) = match self.primary_team() {
            Some(hit) => (Some(hit.team_id), Some(hit.name.clone())),
            None => (None, None),
        };

        DriverStanding {
            id: self.id,
            name: self.name,
            primary_team_id,
            primary_team_name,
            total_points: self.total_points,
            results_count: self.results_count,
        }
    }
}

#[derive(Debug)]
struct TeamRecord {
    id: i32,
    name: String,
    total_points: u64,
    drivers: HashSet<i32>,
}

/// Records keyed by id that keep the order in which ids were first seen.
struct Ordered<T> {
    index: HashMap<i32, usize>,
    records: Vec<T>,
}

impl<T> Ordered<T> {
    fn new() -> Self {
        Ordered {
            index: HashMap::new(),
            records: Vec::new(),
        }
    }

    fn get_or_insert_with(&mut self, id: i32, create: impl FnOnce() -> T) -> &mut T {
        let records = &mut self.records;
        let position = *self.index.entry(id).or_insert_with(|| {
            records.push(create());
            records.len() - 1
        });

        &mut self.records[position]
    }
}

/// rows sorted by result id without cloning them
fn in_id_order(rows: &[ResultRow]) -> Vec<&ResultRow> {
    let mut ordered: Vec<&ResultRow> = rows.iter().collect();
    ordered.sort_by_key(|row| row.result_id);
    ordered
}

/// # compute the leaderboard
/// aggregate all result rows into ranked driver and team standings.
///
/// drivers are ranked by total points, then by the number of results. teams
/// are ranked by total points only. remaining ties keep the order in which
/// the driver or team first appeared in the results.
///
/// ## Arguments
/// * `rows` - every result row, with driver, team and map names
/// * `points` - the points table used to score each row
///
/// ## Returns
/// * `Leaderboard` - the driver and team standings
pub fn compute_leaderboard(rows: &[ResultRow], points: &PointsTable) -> Leaderboard {
    let mut drivers: Ordered<DriverRecord> = Ordered::new();
    let mut teams: Ordered<TeamRecord> = Ordered::new();

    for row in in_id_order(rows) {
        let pts = points.points_for_place(row.place);

        let driver = drivers.get_or_insert_with(row.driver_id, || DriverRecord {
            id: row.driver_id,
            name: row.driver_name.clone(),
            total_points: 0,
            results_count: 0,
            team_hits: Vec::new(),
        });
        driver.total_points = driver.total_points.saturating_add(pts);
        driver.results_count += 1;

        if let Some(team_id) = row.team_id {
            let team_name = row.team_name.as_deref().unwrap_or_default();
            driver.record_team(team_id, team_name);

            let team = teams.get_or_insert_with(team_id, || TeamRecord {
                id: team_id,
                name: team_name.to_string(),
                total_points: 0,
                drivers: HashSet::new(),
            });
            team.total_points = team.total_points.saturating_add(pts);
            team.drivers.insert(row.driver_id);
        }
    }

    let mut driver_standings: Vec<DriverStanding> = drivers
        .records
        .into_iter()
        .map(DriverRecord::into_standing)
        .collect();
    driver_standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.results_count.cmp(&a.results_count))
    });

    let mut team_standings: Vec<TeamStanding> = teams
        .records
        .into_iter()
        .map(|team| TeamStanding {
            id: team.id,
            name: team.name,
            total_points: team.total_points,
            drivers_count: team.drivers.len(),
        })
        .collect();
    team_standings.sort_by(|a, b| b.total_points.cmp(&a.total_points));

    Leaderboard {
        driver_standings,
        team_standings,
    }
}

/// # compute driver details
/// every result of one driver, oldest first, scored with the points table
pub fn compute_driver_details(driver_id: i32, rows: &[ResultRow], points: &PointsTable) -> Vec<DriverDetail> {
    in_id_order(rows)
        .into_iter()
        .filter(|row| row.driver_id == driver_id)
        .map(|row| DriverDetail {
            result_id: row.result_id,
            map_name: row.map_name.clone(),
            team_name: row.team_name.clone(),
            place: row.place,
            time_ms: row.time_ms,
            points_awarded: points.points_for_place(row.place),
        })
        .collect()
}

/// # last team of a driver
/// the team of the driver's result with the highest id. this is the most
/// recent team, which is not necessarily the primary team of the leaderboard.
///
/// ## Returns
/// * `None` - when the driver has no results
pub fn last_team_for_driver(driver_id: i32, rows: &[ResultRow]) -> Option<LastTeam> {
    rows.iter()
        .filter(|row| row.driver_id == driver_id)
        .max_by_key(|row| row.result_id)
        .map(|row| LastTeam {
            result_id: row.result_id,
            team_id: row.team_id,
            team_name: row.team_name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(id: i32, driver: i32, team: Option<i32>, place: i32) -> ResultRow {
        ResultRow {
            result_id: id,
            driver_id: driver,
            driver_name: format!("driver {}", driver),
            team_id: team,
            team_name: team.map(|t| format!("team {}", t)),
            map_id: 1,
            map_name: format!("map {}", id),
            place,
            time_ms: Some(60_000 + i64::from(id)),
        }
    }

    fn table(values: &[u64]) -> PointsTable {
        let candidate: Vec<_> = values.iter().map(|v| json!(v)).collect();
        PointsTable::from_candidate(&candidate).unwrap()
    }

    #[test]
    fn scores_a_single_driver_across_teams() {
        let rows = vec![row(1, 1, Some(10), 1), row(2, 1, Some(20), 3), row(3, 1, Some(20), 2)];
        let board = compute_leaderboard(&rows, &table(&[25, 18, 15]));

        assert_eq!(board.driver_standings.len(), 1);
        let driver = &board.driver_standings[0];
        assert_eq!(driver.total_points, 58);
        assert_eq!(driver.results_count, 3);
        assert_eq!(driver.primary_team_id, Some(20));
        assert_eq!(driver.primary_team_name.as_deref(), Some("team 20"));

        assert_eq!(last_team_for_driver(1, &rows).unwrap().team_id, Some(20));
        assert_eq!(last_team_for_driver(1, &rows).unwrap().result_id, 3);
    }

    #[test]
    fn primary_team_tie_keeps_first_seen_team() {
        // hits end up as A: 3, B: 5, C: 5 with B seen before C
        let mut rows = Vec::new();
        let mut id = 0;
        let mut push = |team: i32, times: usize| {
            for _ in 0..times {
                id += 1;
                rows.push(row(id, 7, Some(team), 1));
            }
        };
        push(1, 3);
        push(2, 5);
        push(3, 5);

        let board = compute_leaderboard(&rows, &PointsTable::default());
        assert_eq!(board.driver_standings[0].primary_team_id, Some(2));
    }

    #[test]
    fn primary_team_is_not_the_last_team() {
        let rows = vec![row(1, 1, Some(10), 1), row(2, 1, Some(10), 1), row(3, 1, Some(20), 1)];
        let board = compute_leaderboard(&rows, &PointsTable::default());

        assert_eq!(board.driver_standings[0].primary_team_id, Some(10));
        assert_eq!(last_team_for_driver(1, &rows).unwrap().team_id, Some(20));
    }

    #[test]
    fn untagged_results_only_count_for_the_driver() {
        let rows = vec![row(1, 1, None, 1), row(2, 2, Some(10), 2)];
        let board = compute_leaderboard(&rows, &table(&[25, 18]));

        let independent = board.driver_standings.iter().find(|d| d.id == 1).unwrap();
        assert_eq!(independent.total_points, 25);
        assert_eq!(independent.primary_team_id, None);
        assert_eq!(independent.primary_team_name, None);

        assert_eq!(board.team_standings.len(), 1);
        assert_eq!(board.team_standings[0].total_points, 18);
        assert_eq!(board.team_standings[0].drivers_count, 1);
    }

    #[test]
    fn places_beyond_the_table_still_count_as_results() {
        let rows = vec![row(1, 1, Some(10), 4), row(2, 1, Some(10), 1)];
        let board = compute_leaderboard(&rows, &table(&[25, 18, 15]));

        assert_eq!(board.driver_standings[0].total_points, 25);
        assert_eq!(board.driver_standings[0].results_count, 2);
    }

    #[test]
    fn drivers_ranked_by_points_then_result_count() {
        let rows = vec![
            row(1, 1, None, 2), // 18
            row(2, 2, None, 3), // 15
            row(3, 2, None, 9), // 0
            row(4, 3, None, 1), // 25
            row(5, 4, None, 2), // 18
            row(6, 4, None, 20), // 0
        ];
        let board = compute_leaderboard(&rows, &table(&[25, 18, 15]));
        let order: Vec<i32> = board.driver_standings.iter().map(|d| d.id).collect();
        assert_eq!(order, vec![3, 4, 1, 2]);

        for pair in board.driver_standings.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.total_points > b.total_points
                || (a.total_points == b.total_points && a.results_count >= b.results_count));
        }
    }

    #[test]
    fn full_ties_keep_first_seen_order() {
        let rows = vec![row(1, 5, None, 1), row(2, 3, None, 1), row(3, 9, None, 1)];
        let board = compute_leaderboard(&rows, &PointsTable::default());
        let order: Vec<i32> = board.driver_standings.iter().map(|d| d.id).collect();
        assert_eq!(order, vec![5, 3, 9]);
    }

    #[test]
    fn team_totals_are_sums_of_tagged_results() {
        let rows = vec![
            row(1, 1, Some(10), 1),
            row(2, 2, Some(10), 2),
            row(3, 1, Some(20), 3),
            row(4, 3, None, 1),
            row(5, 1, Some(10), 2),
        ];
        let points = table(&[25, 18, 15]);
        let board = compute_leaderboard(&rows, &points);

        for team in &board.team_standings {
            let expected: u64 = rows
                .iter()
                .filter(|r| r.team_id == Some(team.id))
                .map(|r| points.points_for_place(r.place))
                .sum();
            assert_eq!(team.total_points, expected);
        }

        let team_10 = board.team_standings.iter().find(|t| t.id == 10).unwrap();
        assert_eq!(team_10.drivers_count, 2);
        assert_eq!(board.team_standings[0].id, 10);

        let all_team_points: u64 = board.team_standings.iter().map(|t| t.total_points).sum();
        let all_driver_points: u64 = board.driver_standings.iter().map(|d| d.total_points).sum();
        assert_eq!(all_team_points, 25 + 18 + 15 + 18);
        assert_eq!(all_driver_points, all_team_points + 25);
    }

    #[test]
    fn rows_are_aggregated_in_id_order() {
        // the later row (id 2) must not decide the tie between team 10 and 20
        let rows = vec![row(2, 1, Some(20), 1), row(1, 1, Some(10), 1)];
        let board = compute_leaderboard(&rows, &PointsTable::default());
        assert_eq!(board.driver_standings[0].primary_team_id, Some(10));
    }

    #[test]
    fn empty_results_give_empty_boards() {
        let board = compute_leaderboard(&[], &PointsTable::default());
        assert!(board.driver_standings.is_empty());
        assert!(board.team_standings.is_empty());
    }

    #[test]
    fn details_follow_id_order_and_aggregator_scoring() {
        let rows = vec![row(3, 1, Some(10), 2), row(1, 1, None, 1), row(2, 2, Some(10), 1), row(5, 1, Some(20), 7)];
        let points = table(&[25, 18, 15]);
        let details = compute_driver_details(1, &rows, &points);

        let ids: Vec<i32> = details.iter().map(|d| d.result_id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(details[0].points_awarded, 25);
        assert_eq!(details[0].team_name, None);
        assert_eq!(details[1].points_awarded, 18);
        assert_eq!(details[1].team_name.as_deref(), Some("team 10"));
        assert_eq!(details[2].points_awarded, 0);
        assert_eq!(details[2].map_name, "map 5");

        let total: u64 = details.iter().map(|d| d.points_awarded).sum();
        let board = compute_leaderboard(&rows, &points);
        let standing = board.driver_standings.iter().find(|d| d.id == 1).unwrap();
        assert_eq!(total, standing.total_points);
    }

    #[test]
    fn last_team_uses_highest_id() {
        let rows = vec![row(9, 1, None, 1), row(4, 1, Some(10), 1), row(12, 2, Some(30), 1)];
        let last = last_team_for_driver(1, &rows).unwrap();
        assert_eq!(last.result_id, 9);
        assert_eq!(last.team_id, None);
        assert_eq!(last.team_name, None);
    }

    #[test]
    fn last_team_of_unknown_driver() {
        assert_eq!(last_team_for_driver(3, &[row(1, 1, Some(10), 1)]), None);
    }

    #[test]
    fn standings_serialize_camel_case() {
        let rows = vec![row(1, 1, Some(10), 1)];
        let board = compute_leaderboard(&rows, &PointsTable::default());
        let value = serde_json::to_value(&board.driver_standings[0]).unwrap();
        assert_eq!(value["primaryTeamId"], json!(10));
        assert_eq!(value["totalPoints"], json!(25));
        assert_eq!(value["resultsCount"], json!(1));
    }
}
