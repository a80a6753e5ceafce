//! Scenario tests for map loading: the wall ring, coordinate flip and
//! code preservation, plus load failure reporting.

use mazecast::*;

fn assert_ring_is_wall(map: &GridMap) {
    let (w, h) = (map.width(), map.height());
    for x in 0..w {
        assert!(map.is_wall(x, 0), "south ring open at x={x}");
        assert!(map.is_wall(x, h - 1), "north ring open at x={x}");
    }
    for y in 0..h {
        assert!(map.is_wall(0, y), "west ring open at y={y}");
        assert!(map.is_wall(w - 1, y), "east ring open at y={y}");
    }
}

#[test]
fn test_two_by_two_content_becomes_four_by_four() {
    let map = GridMap::parse("x0\n00\n").unwrap();
    assert_eq!(map.width(), 4);
    assert_eq!(map.height(), 4);
    assert_ring_is_wall(&map);
    for y in 1..=2 {
        for x in 1..=2 {
            assert!(!map.is_wall(x, y), "interior blocked at ({x},{y})");
        }
    }
}

#[test]
fn test_three_by_three_content_becomes_five_by_five() {
    let map = GridMap::parse("x00\n000\n000\n").unwrap();
    assert_eq!(map.width(), 5);
    assert_eq!(map.height(), 5);
    assert_ring_is_wall(&map);
    for y in 1..=3 {
        for x in 1..=3 {
            assert!(!map.is_wall(x, y));
        }
    }
}

#[test]
fn test_wall_codes_survive_the_flip() {
    // first file line is the northernmost row
    let map = GridMap::parse("123\n4x6\n789\n").unwrap();
    assert_eq!(map.tile(1, 3), 1);
    assert_eq!(map.tile(2, 3), 2);
    assert_eq!(map.tile(3, 3), 3);
    assert_eq!(map.tile(1, 2), 4);
    assert_eq!(map.tile(2, 2), 0);
    assert_eq!(map.tile(3, 2), 6);
    assert_eq!(map.tile(1, 1), 7);
    assert_eq!(map.tile(2, 1), 8);
    assert_eq!(map.tile(3, 1), 9);
    assert_eq!(map.spawn(), Vec2::new(2.5, 2.5));
}

#[test]
fn test_ragged_rows_pad_east_to_the_widest() {
    let map = GridMap::parse("x0000\n0\n000\n").unwrap();
    assert_eq!(map.width(), 7);
    assert_eq!(map.height(), 5);
    assert_ring_is_wall(&map);
    // middle file line has one floor cell, the rest is padding wall
    assert!(!map.is_wall(1, 2));
    for x in 2..=5 {
        assert!(map.is_wall(x, 2), "padding open at ({x},2)");
    }
    // last file line reaches three cells
    assert!(!map.is_wall(3, 1));
    assert!(map.is_wall(4, 1));
}

#[test]
fn test_overlay_lookup_is_bounds_checked() {
    let map = GridMap::parse("x0\n00\n").unwrap();
    assert_eq!(map.cell(0, 0), Some(1));
    assert_eq!(map.cell(1, 1), Some(0));
    assert_eq!(map.cell(-1, 0), None);
    assert_eq!(map.cell(0, 4), None);
}

#[test]
fn test_load_reports_the_missing_path() {
    let err = GridMap::load("no/such/maze.txt").err().unwrap();
    match err {
        MapFormatError::Unreadable { ref path, .. } => {
            assert_eq!(path, "no/such/maze.txt");
        }
        other => panic!("wrong error: {other}"),
    }
    assert!(err.to_string().contains("no/such/maze.txt"));
}
