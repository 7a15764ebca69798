//! Integration tests for round-robin events: one stage, everyone plays everyone.

use chrono::NaiveDate;
use sports_tournament_web::{
    AdvanceOutcome, Event, EventFormat, FinalResult, GameMatch, MemoryStore, NewEvent, Phase,
    ScheduleOutcome, Stage, Team, TournamentError, TournamentService,
};
use std::sync::Arc;
use std::thread;

fn round_robin_with_teams(n: usize) -> (TournamentService<MemoryStore>, Event, Vec<Team>) {
    let svc = TournamentService::new(MemoryStore::new());
    let event = svc
        .create_event(NewEvent {
            name: "Spring League".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 6).unwrap(),
            sport_type: "football".to_string(),
            format: EventFormat::RoundRobin,
            group_count: None,
        })
        .unwrap();
    let teams = (0..n)
        .map(|i| svc.add_team(event.id, &format!("Team {i}")).unwrap())
        .collect();
    (svc, event, teams)
}

fn scheduled(svc: &TournamentService<MemoryStore>, event: &Event) -> (Stage, Vec<GameMatch>) {
    let stage = svc.generate_stages(event.id).unwrap().remove(0);
    let matches = svc.schedule_stage(event.id, stage.id).unwrap().matches().to_vec();
    (stage, matches)
}

#[test]
fn single_stage_labelled_rr() {
    let (svc, event, _) = round_robin_with_teams(4);
    let stages = svc.generate_stages(event.id).unwrap();
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].label, "RR");
    assert_eq!(stages[0].ordinal, 0);
}

#[test]
fn generate_stages_twice_returns_same_stages() {
    let (svc, event, _) = round_robin_with_teams(4);
    let first = svc.generate_stages(event.id).unwrap();
    let second = svc.generate_stages(event.id).unwrap();
    assert_eq!(first, second);
}

#[test]
fn generate_needs_two_teams() {
    let (svc, event, _) = round_robin_with_teams(1);
    assert_eq!(
        svc.generate_stages(event.id),
        Err(TournamentError::NotEnoughTeams {
            required: 2,
            actual: 1
        })
    );
}

#[test]
fn four_teams_play_six_matches() {
    let (svc, event, teams) = round_robin_with_teams(4);
    let (_, matches) = scheduled(&svc, &event);
    assert_eq!(matches.len(), 6);
    for (i, a) in teams.iter().enumerate() {
        for b in &teams[i + 1..] {
            let meetings = matches
                .iter()
                .filter(|m| m.involves(a.id) && m.involves(b.id))
                .count();
            assert_eq!(meetings, 1, "{} vs {}", a.name, b.name);
        }
    }
    // Outer loop first: team 0 plays its three matches first.
    assert!(matches[..3].iter().all(|m| m.team_1 == teams[0].id));
}

#[test]
fn schedule_twice_is_a_no_op() {
    let (svc, event, _) = round_robin_with_teams(4);
    let (stage, matches) = scheduled(&svc, &event);
    match svc.schedule_stage(event.id, stage.id).unwrap() {
        ScheduleOutcome::AlreadyScheduled { matches: again } => assert_eq!(again, matches),
        other => panic!("expected AlreadyScheduled, got {other:?}"),
    }
    assert_eq!(svc.event_detail(event.id).unwrap().matches.len(), 6);
}

#[test]
fn advance_is_pending_until_every_result_is_in() {
    let (svc, event, _) = round_robin_with_teams(4);
    let (stage, matches) = scheduled(&svc, &event);
    svc.record_result(matches[0].id, 2, 0).unwrap();
    assert_eq!(
        svc.check_advance(event.id, stage.id).unwrap(),
        AdvanceOutcome::Pending {
            stage_id: stage.id,
            decided: 1,
            total: 6
        }
    );
    assert!(!svc.is_stage_complete(event.id, stage.id).unwrap());
    assert_eq!(
        svc.get_final_result(event.id),
        Err(TournamentError::StageIncomplete(stage.id))
    );
}

#[test]
fn team_winning_every_match_ranks_first_and_event_ends() {
    let (svc, event, teams) = round_robin_with_teams(4);
    let (stage, matches) = scheduled(&svc, &event);
    assert_eq!(svc.progress(event.id).unwrap().phase, Phase::StageInProgress);

    // Team 1 of every match wins, so the ranking follows the creation order.
    for m in &matches {
        svc.record_result(m.id, 1, 0).unwrap();
    }
    assert!(svc.is_stage_complete(event.id, stage.id).unwrap());
    assert_eq!(svc.progress(event.id).unwrap().phase, Phase::StageComplete);

    let standings = svc.get_standings(event.id, &[]).unwrap();
    assert_eq!(standings.len(), 1);
    let top = &standings[0].rows[0];
    assert_eq!(top.team_id, teams[0].id);
    assert_eq!((top.played, top.wins, top.points), (3, 3, 9));

    match svc.check_advance(event.id, stage.id).unwrap() {
        AdvanceOutcome::Finished { winner, runner_up } => {
            assert_eq!(winner.id, teams[0].id);
            assert_eq!(runner_up.map(|t| t.id), Some(teams[1].id));
        }
        other => panic!("expected Finished, got {other:?}"),
    }
    assert!(svc.event(event.id).unwrap().ended);
    assert_eq!(svc.progress(event.id).unwrap().phase, Phase::Final);

    match svc.get_final_result(event.id).unwrap() {
        FinalResult::Ranking { ranking } => {
            let ranks: Vec<u32> = ranking.iter().map(|r| r.rank).collect();
            assert_eq!(ranks, [1, 2, 3, 4]);
            let order: Vec<_> = ranking.iter().map(|r| r.team.id).collect();
            let expected: Vec<_> = teams.iter().map(|t| t.id).collect();
            assert_eq!(order, expected);
        }
        other => panic!("expected a ranking, got {other:?}"),
    }
}

#[test]
fn finished_event_rejects_results_and_repeats_outcome() {
    let (svc, event, _) = round_robin_with_teams(3);
    let (stage, matches) = scheduled(&svc, &event);
    for m in &matches {
        svc.record_result(m.id, 0, 1).unwrap();
    }
    let first = svc.check_advance(event.id, stage.id).unwrap();
    let second = svc.check_advance(event.id, stage.id).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        svc.record_result(matches[0].id, 5, 5),
        Err(TournamentError::EventEnded)
    );
}

#[test]
fn goal_difference_breaks_points_tie() {
    let (svc, event, teams) = round_robin_with_teams(3);
    let (_, matches) = scheduled(&svc, &event);
    // (0,1) (0,2) (1,2): every team wins once, team 2 by the biggest margins.
    svc.record_result(matches[0].id, 1, 0).unwrap();
    svc.record_result(matches[1].id, 0, 4).unwrap();
    svc.record_result(matches[2].id, 2, 1).unwrap();
    let rows = &svc.get_standings(event.id, &[]).unwrap()[0].rows;
    assert!(rows.iter().all(|r| r.points == 3));
    assert_eq!(rows[0].team_id, teams[2].id);
    assert_eq!(rows[0].goal_difference, 3);
}

#[test]
fn concurrent_generate_and_schedule_create_everything_once() {
    let (svc, event, _) = round_robin_with_teams(6);
    let svc = Arc::new(svc);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let svc = Arc::clone(&svc);
            let event_id = event.id;
            thread::spawn(move || {
                let stage = svc.generate_stages(event_id).unwrap().remove(0);
                svc.schedule_stage(event_id, stage.id).unwrap()
            })
        })
        .collect();
    let outcomes: Vec<ScheduleOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let scheduled = outcomes
        .iter()
        .filter(|o| matches!(o, ScheduleOutcome::Scheduled { .. }))
        .count();
    assert_eq!(scheduled, 1);
    assert!(outcomes.iter().all(|o| o.matches().len() == 15));

    let detail = svc.event_detail(event.id).unwrap();
    assert_eq!(detail.stages.len(), 1);
    assert_eq!(detail.matches.len(), 15);
}

#[test]
fn largest_scores_still_rank_and_finish() {
    let (svc, event, teams) = round_robin_with_teams(3);
    let (stage, matches) = scheduled(&svc, &event);
    // Team 0 plays the first two matches.
    svc.record_result(matches[0].id, u32::MAX, 0).unwrap();
    svc.record_result(matches[1].id, u32::MAX, 0).unwrap();
    svc.record_result(matches[2].id, 1, 0).unwrap();

    let rows = &svc.get_standings(event.id, &[]).unwrap()[0].rows;
    assert_eq!(rows[0].team_id, teams[0].id);
    assert_eq!(rows[0].scored, 2 * u64::from(u32::MAX));
    assert!(matches!(
        svc.check_advance(event.id, stage.id).unwrap(),
        AdvanceOutcome::Finished { ref winner, .. } if winner.id == teams[0].id
    ));
}
