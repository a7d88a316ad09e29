use super::*;

// =============================================================
// instruction_for
// =============================================================

#[test]
fn each_bucket_has_a_representative() {
    let all = all_instructions();
    assert_eq!(instruction_for(0.0), all[0]);
    assert_eq!(instruction_for(0.3), all[1]);
    assert_eq!(instruction_for(0.5), all[2]);
    assert_eq!(instruction_for(0.7), all[3]);
    assert_eq!(instruction_for(0.9), all[4]);
    assert_eq!(instruction_for(1.0), all[4]);
}

#[test]
fn boundaries_map_to_lower_bucket() {
    let all = all_instructions();
    assert_eq!(instruction_for(0.2), all[0]);
    assert_eq!(instruction_for(0.4), all[1]);
    assert_eq!(instruction_for(0.6), all[2]);
    assert_eq!(instruction_for(0.8), all[3]);
}

#[test]
fn just_above_boundaries_map_to_upper_bucket() {
    let all = all_instructions();
    assert_eq!(instruction_for(0.200_001), all[1]);
    assert_eq!(instruction_for(0.400_001), all[2]);
    assert_eq!(instruction_for(0.600_001), all[3]);
    assert_eq!(instruction_for(0.800_001), all[4]);
}

#[test]
fn mapping_is_total_over_unit_interval() {
    let all = all_instructions();
    for step in 0..=1000 {
        let level = f64::from(step) / 1000.0;
        let text = instruction_for(level);
        assert_eq!(all.iter().filter(|t| **t == text).count(), 1, "level {level}");
        assert_eq!(instruction_for(level), text);
    }
}

#[test]
fn instructions_are_distinct() {
    let all = all_instructions();
    for (i, a) in all.iter().enumerate() {
        for (j, b) in all.iter().enumerate() {
            assert_eq!(i == j, a == b);
        }
    }
}

#[test]
fn out_of_range_levels_are_clamped() {
    let all = all_instructions();
    assert_eq!(instruction_for(-3.0), all[0]);
    assert_eq!(instruction_for(7.5), all[4]);
    assert_eq!(instruction_for(f64::NEG_INFINITY), all[0]);
}

#[test]
fn nan_picks_middle_bucket() {
    assert_eq!(instruction_for(f64::NAN), all_instructions()[2]);
}

// =============================================================
// compose_prompt
// =============================================================

#[test]
fn compose_prompt_joins_prompt_instruction_and_style() {
    let text = compose_prompt("add a sun", 0.9);
    assert!(text.starts_with("add a sun. "));
    assert!(text.contains(all_instructions()[4]));
    assert!(text.ends_with(STYLE_DIRECTIVE));
}

#[test]
fn compose_prompt_does_not_double_the_period() {
    let text = compose_prompt("  a cat on a mat.  ", 0.5);
    assert!(text.starts_with("a cat on a mat. "));
    assert!(!text.contains(".."));
}
