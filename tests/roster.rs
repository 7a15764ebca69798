//! Integration tests for events and their teams: adding, importing, locking and drawing pools.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sports_tournament_web::{
    Event, EventFormat, MemoryStore, NewEvent, TournamentError, TournamentService,
};

type Service = TournamentService<MemoryStore>;

fn new_event(svc: &Service, name: &str, format: EventFormat, group_count: Option<u8>) -> Event {
    svc.create_event(NewEvent {
        name: name.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 18).unwrap(),
        sport_type: "volleyball".to_string(),
        format,
        group_count,
    })
    .unwrap()
}

#[test]
fn event_name_is_required() {
    let svc = Service::new(MemoryStore::new());
    let result = svc.create_event(NewEvent {
        name: "   ".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 18).unwrap(),
        sport_type: String::new(),
        format: EventFormat::RoundRobin,
        group_count: None,
    });
    assert_eq!(result, Err(TournamentError::EmptyName));
}

#[test]
fn events_are_listed_by_date() {
    let svc = Service::new(MemoryStore::new());
    let later = svc
        .create_event(NewEvent {
            name: "Autumn".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            sport_type: String::new(),
            format: EventFormat::Knockout,
            group_count: None,
        })
        .unwrap();
    let earlier = new_event(&svc, "Spring", EventFormat::RoundRobin, None);
    let ids: Vec<_> = svc.list_events().unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, [earlier.id, later.id]);
}

#[test]
fn team_names_are_unique_per_event() {
    let svc = Service::new(MemoryStore::new());
    let event = new_event(&svc, "Beach Open", EventFormat::RoundRobin, None);
    let other = new_event(&svc, "Indoor Open", EventFormat::RoundRobin, None);

    let sharks = svc.add_team(event.id, "  Sharks ").unwrap();
    assert_eq!(sharks.name, "Sharks");
    assert_eq!(sharks.sequence, 1);
    assert_eq!(
        svc.add_team(event.id, "SHARKS"),
        Err(TournamentError::DuplicateTeamName("SHARKS".to_string()))
    );
    assert_eq!(svc.add_team(event.id, ""), Err(TournamentError::EmptyName));
    // Same name in another event is fine.
    assert!(svc.add_team(other.id, "Sharks").is_ok());
    assert_eq!(svc.add_team(event.id, "Rays").unwrap().sequence, 2);
}

#[test]
fn roster_locks_once_stages_exist() {
    let svc = Service::new(MemoryStore::new());
    let event = new_event(&svc, "League", EventFormat::RoundRobin, None);
    let a = svc.add_team(event.id, "A").unwrap();
    svc.add_team(event.id, "B").unwrap();
    svc.generate_stages(event.id).unwrap();

    assert_eq!(svc.add_team(event.id, "C"), Err(TournamentError::RosterLocked));
    assert_eq!(
        svc.remove_team(event.id, a.id),
        Err(TournamentError::RosterLocked)
    );
    assert_eq!(
        svc.import_teams_csv(event.id, "name\nC\n"),
        Err(TournamentError::RosterLocked)
    );
}

#[test]
fn remove_team_before_stages() {
    let svc = Service::new(MemoryStore::new());
    let event = new_event(&svc, "League", EventFormat::RoundRobin, None);
    let a = svc.add_team(event.id, "A").unwrap();
    svc.remove_team(event.id, a.id).unwrap();
    assert!(svc.event_detail(event.id).unwrap().teams.is_empty());
    assert_eq!(
        svc.remove_team(event.id, a.id),
        Err(TournamentError::TeamNotFound(a.id))
    );
}

#[test]
fn csv_import_is_all_or_nothing() {
    let svc = Service::new(MemoryStore::new());
    let event = new_event(&svc, "League", EventFormat::Knockout, None);
    svc.add_team(event.id, "Falcons").unwrap();

    let added = svc
        .import_teams_csv(event.id, "name,coach\nEagles,Kim\n Hawks ,Lee\n")
        .unwrap();
    let names: Vec<_> = added.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Eagles", "Hawks"]);
    assert_eq!(added[1].sequence, 3);

    assert_eq!(
        svc.import_teams_csv(event.id, "name\nOwls\nfalcons\n"),
        Err(TournamentError::DuplicateTeamName("falcons".to_string()))
    );
    assert_eq!(svc.event_detail(event.id).unwrap().teams.len(), 3);
}

#[test]
fn draw_spreads_teams_over_pools() {
    let svc = Service::new(MemoryStore::new());
    let event = new_event(&svc, "Cup", EventFormat::GroupKnockout, Some(2));
    for i in 0..8 {
        svc.add_team(event.id, &format!("Team {i}")).unwrap();
    }
    let stages = svc.generate_stages(event.id).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let teams = svc.draw_pools(event.id, &mut rng).unwrap();

    for pool in &stages[..2] {
        let in_pool = teams.iter().filter(|t| t.stage_id == Some(pool.id)).count();
        assert_eq!(in_pool, 4, "pool {}", pool.label);
    }

    // Once a pool is scheduled the draw is final.
    svc.schedule_stage(event.id, stages[0].id).unwrap();
    assert_eq!(
        svc.draw_pools(event.id, &mut rng),
        Err(TournamentError::StageLocked(stages[0].id))
    );
}

#[test]
fn teams_are_assigned_to_pools_only() {
    let svc = Service::new(MemoryStore::new());
    let event = new_event(&svc, "Cup", EventFormat::GroupKnockout, Some(2));
    let teams: Vec<_> = (0..4)
        .map(|i| svc.add_team(event.id, &format!("Team {i}")).unwrap())
        .collect();
    let stages = svc.generate_stages(event.id).unwrap();
    let semi = &stages[2];
    assert_eq!(
        svc.assign_team(event.id, teams[0].id, semi.id),
        Err(TournamentError::NotAPoolStage(semi.id))
    );

    let moved = svc.assign_team(event.id, teams[0].id, stages[1].id).unwrap();
    assert_eq!(moved.stage_id, Some(stages[1].id));
}

#[test]
fn draw_requires_stages() {
    let svc = Service::new(MemoryStore::new());
    let event = new_event(&svc, "Cup", EventFormat::GroupKnockout, Some(2));
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        svc.draw_pools(event.id, &mut rng),
        Err(TournamentError::NoStages)
    );
}

#[test]
fn deleted_event_is_gone() {
    let svc = Service::new(MemoryStore::new());
    let event = new_event(&svc, "Friendly", EventFormat::Knockout, None);
    svc.add_team(event.id, "Reds").unwrap();
    svc.delete_event(event.id).unwrap();
    assert_eq!(svc.event(event.id), Err(TournamentError::EventNotFound(event.id)));
    assert_eq!(
        svc.delete_event(event.id),
        Err(TournamentError::EventNotFound(event.id))
    );
    assert!(svc.list_events().unwrap().is_empty());
}
