//! 팀 이름 정규화
//!
//! HLDS 로그는 플레이어 태그 안에서 긴 팀 이름(`TERRORIST`)을 쓰고,
//! `Team "CT"` 같은 문장에서는 짧은 코드를 씁니다.
//! 출력 필드는 항상 짧은 코드(`T`, `CT`)로 통일합니다.
//! 알 수 없는 값(`SPECTATOR`, 빈 문자열 등)은 그대로 통과합니다.

/// 테러리스트 짧은 코드
pub const TERRORIST: &str = "T";
/// 대테러부대 짧은 코드
pub const COUNTER_TERRORIST: &str = "CT";

/// 짧은 팀 코드를 표시용 전체 이름으로 바꿉니다.
///
/// `"T"` → `"Terrorist"`, `"CT"` → `"Counter-Terrorist"`, 그 외는 그대로 반환합니다.
pub fn full_name(team: &str) -> &str {
    match team {
        TERRORIST => "Terrorist",
        COUNTER_TERRORIST => "Counter-Terrorist",
        other => other,
    }
}

/// 팀 이름을 짧은 코드로 바꿉니다.
///
/// 로그 태그 형식(`"TERRORIST"`)과 [`full_name`]의 표시 형식(`"Terrorist"`,
/// `"Counter-Terrorist"`)을 모두 받습니다. 이미 짧은 코드면 그대로 반환하므로
/// 여러 번 적용해도 결과가 같습니다.
pub fn short_name(team: &str) -> &str {
    match team {
        "TERRORIST" | "Terrorist" => TERRORIST,
        "Counter-Terrorist" => COUNTER_TERRORIST,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn full_name_expands_known_codes() {
        assert_eq!(full_name("T"), "Terrorist");
        assert_eq!(full_name("CT"), "Counter-Terrorist");
    }

    #[test]
    fn short_name_collapses_log_form() {
        assert_eq!(short_name("TERRORIST"), "T");
        assert_eq!(short_name("CT"), "CT");
    }

    #[test]
    fn unknown_teams_pass_through() {
        assert_eq!(full_name("SPECTATOR"), "SPECTATOR");
        assert_eq!(short_name("SPECTATOR"), "SPECTATOR");
        assert_eq!(short_name(""), "");
    }

    #[test]
    fn names_are_mutual_inverses_on_known_pairs() {
        for code in [TERRORIST, COUNTER_TERRORIST] {
            assert_eq!(short_name(full_name(code)), code);
        }
        for name in ["Terrorist", "Counter-Terrorist"] {
            assert_eq!(full_name(short_name(name)), name);
        }
    }

    proptest! {
        #[test]
        fn short_name_is_idempotent(team in "\\PC{0,16}") {
            let once = short_name(&team);
            prop_assert_eq!(short_name(once), once);
        }

        #[test]
        fn full_name_is_identity_outside_known_codes(team in "[A-Za-z_]{0,12}") {
            prop_assume!(team != "T" && team != "CT");
            prop_assert_eq!(full_name(&team), team.as_str());
        }
    }
}
