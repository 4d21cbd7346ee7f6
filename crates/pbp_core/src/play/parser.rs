//! Play code grammar
//!
//! Ordered-choice combinator grammar: every `choice` tries its alternatives in
//! source order and keeps the first that matches. Order matters in several
//! places (`WP` before `W`, `HR<fielders>` before bare `HR`, `BGDP` before
//! `BG`) and must not be rearranged.
//!
//! ```text
//! play         = basic_play modifiers advancements EOF
//! modifiers    = ("/" modifier ("/" modifier)*)?
//! advancements = ("." advancement (";" advancement)*)?
//! ```

use chumsky::error::RichPattern;
use chumsky::prelude::*;

use super::ast::{
    Advancement, Base, Baserunning, BasicPlay, Contact, Depth, Fielder, Fielders, Fielding,
    FieldingError, Hit, HitLocation, Modifier, ModifierKind, Play, RunAnnotation, Severity, Zone,
};
use super::failure::ParseFailure;

type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Parse one play code. The whole input must be consumed.
pub fn parse_play(code: &str) -> Result<Play, ParseFailure> {
    play()
        .parse(code)
        .into_result()
        .map_err(|errors| failure_from(code, &errors))
}

fn failure_from(code: &str, errors: &[Rich<'_, char>]) -> ParseFailure {
    let offset = errors.iter().map(|e| e.span().start).max().unwrap_or(0);

    let mut expected: Vec<String> = Vec::new();
    for error in errors.iter().filter(|e| e.span().start == offset) {
        for pattern in error.expected() {
            let label = pattern_label(pattern);
            if !expected.contains(&label) {
                expected.push(label);
            }
        }
    }

    ParseFailure::new(code, offset + 1, expected)
}

fn pattern_label(pattern: &RichPattern<'_, char>) -> String {
    match pattern {
        RichPattern::Token(token) => format!("'{}'", &**token),
        RichPattern::Label(label) => label.to_string(),
        RichPattern::EndOfInput => "end of input".to_string(),
        other => format!("{other:?}"),
    }
}

// ============================================================================
// Primitives
// ============================================================================

fn paren<'src, O>(
    inner: impl Parser<'src, &'src str, O, Extra<'src>> + Clone,
) -> impl Parser<'src, &'src str, O, Extra<'src>> + Clone {
    inner.delimited_by(just('('), just(')'))
}

fn fielder<'src>() -> impl Parser<'src, &'src str, Fielder, Extra<'src>> + Clone {
    one_of("123456789")
        .map(|digit: char| Fielder::ALL[(digit as u8 - b'1') as usize])
        .labelled("position")
}

fn fielders<'src>() -> impl Parser<'src, &'src str, Fielders, Extra<'src>> + Clone {
    fielder()
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .map(Fielders)
        .labelled("fielders")
}

fn fielding_error<'src>() -> impl Parser<'src, &'src str, FieldingError, Extra<'src>> + Clone {
    fielder()
        .or_not()
        .then_ignore(just('E'))
        .then(fielder())
        .then(just("/TH").or_not().map(|th| th.is_some()))
        .map(|((thrower, fielder), throwing)| FieldingError {
            thrower,
            fielder,
            throwing,
        })
}

/// Error first, then a plain putout chain
fn fielding<'src>() -> impl Parser<'src, &'src str, Fielding, Extra<'src>> + Clone {
    fielding_error()
        .map(Fielding::Error)
        .or(fielders().map(Fielding::Assists))
}

fn run_annotation<'src>() -> impl Parser<'src, &'src str, RunAnnotation, Extra<'src>> + Clone {
    paren(choice((
        fielding_error().map(RunAnnotation::Error),
        just("TUR").to(RunAnnotation::TeamUnearnedRun),
        just("UR").to(RunAnnotation::UnearnedRun),
        just("RBI").to(RunAnnotation::RbiCredited),
        just("NR").or(just("NORBI")).to(RunAnnotation::NoRbiCredited),
    )))
}

fn base<'src>() -> impl Parser<'src, &'src str, Base, Extra<'src>> + Clone {
    choice((
        just('1').to(Base::First),
        just('2').to(Base::Second),
        just('3').to(Base::Third),
        just('H')
            .ignore_then(run_annotation().repeated().collect::<Vec<_>>())
            .map(|annotations| Base::Home { annotations }),
        just('B').to(Base::home()),
    ))
    .labelled("base")
}

// ============================================================================
// Basic plays
// ============================================================================

fn hit<'src>() -> impl Parser<'src, &'src str, Hit, Extra<'src>> + Clone {
    let home_run = just("HR").or(just("H"));

    choice((
        just('S')
            .ignore_then(fielders())
            .map(|fielders| Hit::Single { fielders }),
        just('D')
            .ignore_then(fielders())
            .map(|fielders| Hit::Double { fielders }),
        just('T')
            .ignore_then(fielders())
            .map(|fielders| Hit::Triple { fielders }),
        home_run
            .clone()
            .ignore_then(fielders())
            .map(|fielders| Hit::InsideTheParkHomeRun { fielders }),
        home_run.to(Hit::HomeRun),
        just("DGR").to(Hit::GroundRuleDouble),
    ))
}

fn stolen_base<'src>() -> impl Parser<'src, &'src str, Base, Extra<'src>> + Clone {
    just("SB").ignore_then(base())
}

fn baserunning<'src>() -> impl Parser<'src, &'src str, Baserunning, Extra<'src>> + Clone {
    choice((
        just("BK").to(Baserunning::Balk),
        just("CS")
            .ignore_then(base())
            .then(paren(fielders()))
            .map(|(base, fielders)| Baserunning::CaughtStealing { base, fielders }),
        just("PO")
            .ignore_then(base())
            .then(paren(fielding()))
            .map(|(base, fielding)| Baserunning::PickOff { base, fielding }),
        stolen_base()
            .separated_by(just(';'))
            .at_least(2)
            .collect::<Vec<_>>()
            .map(|bases| Baserunning::DoubleSteal { bases }),
        stolen_base().map(|base| Baserunning::StolenBase { base }),
        just("PB").to(Baserunning::PassedBall),
        just("DI").to(Baserunning::DefensiveIndifference),
        just("WP").to(Baserunning::WildPitch),
    ))
    .boxed()
}

/// `+`-prefixed runner events riding on a strikeout or walk
fn add_ons<'src>() -> impl Parser<'src, &'src str, Vec<Baserunning>, Extra<'src>> + Clone {
    just('+')
        .ignore_then(baserunning())
        .repeated()
        .collect::<Vec<_>>()
}

fn basic_play<'src>() -> impl Parser<'src, &'src str, BasicPlay, Extra<'src>> + Clone {
    choice((
        just("FLE")
            .ignore_then(fielder())
            .map(|fielder| BasicPlay::ErrorOnFoulFly { fielder }),
        just("NP").to(BasicPlay::NoPlay),
        baserunning().map(BasicPlay::Baserunning),
        just("FC")
            .ignore_then(fielders().or_not())
            .map(|fielders| BasicPlay::FieldersChoice { fielders }),
        fielding_error().map(BasicPlay::Error),
        fielders()
            .then(paren(base()))
            .then(fielders())
            .map(|((first, base), second)| BasicPlay::DoublePlay {
                first,
                base,
                second,
            }),
        fielders()
            .then(paren(base()).or_not())
            .map(|(fielders, base)| BasicPlay::Out { fielders, base }),
        just('W')
            .ignore_then(add_ons())
            .map(|baserunning| BasicPlay::Walk { baserunning }),
        just("HP").to(BasicPlay::HitByPitch),
        hit().map(BasicPlay::Hit),
        just('K')
            .ignore_then(add_ons())
            .map(|baserunning| BasicPlay::Strikeout { baserunning }),
        just('I')
            .then(just('W').or_not())
            .ignore_then(add_ons())
            .map(|baserunning| BasicPlay::IntentionalWalk { baserunning }),
        just("C/E")
            .ignore_then(fielder())
            .map(|fielder| BasicPlay::Interference { fielder }),
    ))
    .boxed()
}

// ============================================================================
// Modifiers
// ============================================================================

fn zone<'src>() -> impl Parser<'src, &'src str, Zone, Extra<'src>> + Clone {
    fielder()
        .map(Zone::Fielder)
        .or(just('0').to(Zone::Unknown))
}

fn hit_location<'src>() -> impl Parser<'src, &'src str, HitLocation, Extra<'src>> + Clone {
    zone()
        .repeated()
        .at_least(1)
        .at_most(2)
        .collect::<Vec<_>>()
        .then(just('L').or_not().map(|l| l.is_some()))
        .then(
            choice((
                just('M').to(Severity::Medium),
                just('X').to(Severity::Extra),
            ))
            .or_not(),
        )
        .then(
            choice((just('D').to(Depth::Deep), just('S').to(Depth::Shallow))).or_not(),
        )
        .then(just('F').or_not().map(|f| f.is_some()))
        .then(
            choice((just('+').to(Contact::Hard), just('-').to(Contact::Soft))).or_not(),
        )
        .map(
            |(((((zones, toward_line), severity), depth), foul), contact)| HitLocation {
                zones,
                toward_line,
                severity,
                depth,
                foul,
                contact,
            },
        )
        .labelled("hit location")
}

fn modifier_kind<'src>() -> impl Parser<'src, &'src str, ModifierKind, Extra<'src>> + Clone {
    // Split in three to stay under the tuple arity `choice` accepts; order is global.
    let bunts_and_courtesy = choice((
        just("AP").to(ModifierKind::AppealPlay),
        just("BGDP").to(ModifierKind::BuntGroundedIntoDoublePlay),
        just("BG").to(ModifierKind::GroundBallBunt),
        just("BINT").to(ModifierKind::BatterInterference),
        just("BL").to(ModifierKind::LineDriveBunt),
        just("BOOT").to(ModifierKind::BattingOutOfTurn),
        just("BPDP").to(ModifierKind::BuntPoppedIntoDoublePlay),
        just("BP").to(ModifierKind::BuntPopUp),
        just("BR").to(ModifierKind::RunnerHitByBattedBall),
        just("COUB").to(ModifierKind::CourtesyBatter),
        just("COUF").to(ModifierKind::CourtesyFielder),
        just("COUR").to(ModifierKind::CourtesyRunner),
        just('C').to(ModifierKind::CalledThirdStrike),
        just("DP").to(ModifierKind::DoublePlay),
        just('E').ignore_then(fielder()).map(ModifierKind::Error),
    ));

    let batted_balls = choice((
        just("FDP").to(ModifierKind::FlyBallDoublePlay),
        just("FINT").to(ModifierKind::FanInterference),
        just("FL").to(ModifierKind::Foul),
        just("FO").to(ModifierKind::ForceOut),
        just('F').to(ModifierKind::Fly),
        just("GDP").to(ModifierKind::GroundBallDoublePlay),
        just("GTP").to(ModifierKind::GroundBallTriplePlay),
        just('G').to(ModifierKind::GroundBall),
        just("IF").to(ModifierKind::InfieldFly),
        just("INT").to(ModifierKind::Interference),
        just("IPHR").to(ModifierKind::InsideTheParkHomeRun),
        just("LDP").to(ModifierKind::LinedIntoDoublePlay),
        just("LTP").to(ModifierKind::LinedIntoTriplePlay),
        just('L').to(ModifierKind::LineDrive),
        just("MREV").to(ModifierKind::ManagerReview),
    ));

    let rulings = choice((
        just("NDP").to(ModifierKind::NoDoublePlay),
        just("OBS").to(ModifierKind::Obstruction),
        just("PASS").to(ModifierKind::RunnerPassed),
        just('P').to(ModifierKind::PopFly),
        just("RINT").to(ModifierKind::RunnerInterference),
        just('R').ignore_then(fielder()).map(ModifierKind::Relay),
        just("SF").to(ModifierKind::SacrificeFly),
        just("SH").to(ModifierKind::SacrificeHit),
        just("TH").ignore_then(base()).map(ModifierKind::ThrowTo),
        just("TH").to(ModifierKind::Throw),
        just("TP").to(ModifierKind::TriplePlay),
        just("UINT").to(ModifierKind::UmpireInterference),
        just("UREV").to(ModifierKind::UmpireReview),
    ));

    choice((bunts_and_courtesy, batted_balls, rulings))
        .labelled("modifier")
        .boxed()
}

fn modifier<'src>() -> impl Parser<'src, &'src str, Modifier, Extra<'src>> + Clone {
    modifier_kind()
        .then(hit_location().or_not())
        .map(|(kind, location)| Modifier { kind, location })
}

fn modifiers<'src>() -> impl Parser<'src, &'src str, Vec<Modifier>, Extra<'src>> + Clone {
    just('/')
        .ignore_then(modifier().separated_by(just('/')).collect::<Vec<_>>())
        .or_not()
        .map(Option::unwrap_or_default)
}

// ============================================================================
// Advancements
// ============================================================================

fn advancement<'src>() -> impl Parser<'src, &'src str, Advancement, Extra<'src>> + Clone {
    choice((
        base()
            .then_ignore(just('-'))
            .then(base())
            .then(paren(fielding_error()).or_not())
            .map(|((from, to), error)| Advancement::Successful { from, to, error }),
        base()
            .then_ignore(just('X'))
            .then(base())
            .then(paren(fielding()).or_not())
            .map(|((from, to), fielding)| Advancement::Failed { from, to, fielding }),
    ))
    .labelled("advancement")
}

fn advancements<'src>() -> impl Parser<'src, &'src str, Vec<Advancement>, Extra<'src>> + Clone {
    just('.')
        .ignore_then(advancement().separated_by(just(';')).collect::<Vec<_>>())
        .or_not()
        .map(Option::unwrap_or_default)
}

fn play<'src>() -> impl Parser<'src, &'src str, Play, Extra<'src>> {
    basic_play()
        .then(modifiers())
        .then(advancements())
        .then_ignore(end())
        .map(|((basic, modifiers), advancements)| Play {
            basic,
            modifiers,
            advancements,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> Play {
        match parse_play(code) {
            Ok(play) => play,
            Err(failure) => panic!("{code} should parse: {failure}"),
        }
    }

    fn chain(digits: &str) -> Fielders {
        Fielders(
            digits
                .chars()
                .map(|d| Fielder::from_digit(d).expect("digit"))
                .collect(),
        )
    }

    #[test]
    fn test_single_to_left() {
        let play = parse("S7");
        assert_eq!(
            play.basic,
            BasicPlay::Hit(Hit::Single {
                fielders: chain("7")
            })
        );
        assert!(play.modifiers.is_empty());
        assert!(play.advancements.is_empty());
    }

    #[test]
    fn test_double_play_with_force_at_first() {
        let play = parse("64(1)3");
        assert_eq!(
            play.basic,
            BasicPlay::DoublePlay {
                first: chain("64"),
                base: Base::First,
                second: chain("3"),
            }
        );
    }

    #[test]
    fn test_out_with_optional_base() {
        assert_eq!(
            parse("63").basic,
            BasicPlay::Out {
                fielders: chain("63"),
                base: None
            }
        );
        assert_eq!(
            parse("54(1)").basic,
            BasicPlay::Out {
                fielders: chain("54"),
                base: Some(Base::First)
            }
        );
    }

    #[test]
    fn test_home_run_versus_inside_the_park() {
        assert_eq!(parse("HR").basic, BasicPlay::Hit(Hit::HomeRun));
        assert_eq!(parse("H").basic, BasicPlay::Hit(Hit::HomeRun));
        assert_eq!(
            parse("HR8").basic,
            BasicPlay::Hit(Hit::InsideTheParkHomeRun {
                fielders: chain("8")
            })
        );
        assert_eq!(
            parse("H9").basic,
            BasicPlay::Hit(Hit::InsideTheParkHomeRun {
                fielders: chain("9")
            })
        );
    }

    #[test]
    fn test_wild_pitch_is_not_a_walk() {
        assert_eq!(
            parse("WP").basic,
            BasicPlay::Baserunning(Baserunning::WildPitch)
        );
        assert_eq!(
            parse("W+WP").basic,
            BasicPlay::Walk {
                baserunning: vec![Baserunning::WildPitch]
            }
        );
    }

    #[test]
    fn test_hit_by_pitch_wins_over_hit() {
        assert_eq!(parse("HP").basic, BasicPlay::HitByPitch);
    }

    #[test]
    fn test_caught_stealing() {
        assert_eq!(
            parse("CS2(24)").basic,
            BasicPlay::Baserunning(Baserunning::CaughtStealing {
                base: Base::Second,
                fielders: chain("24"),
            })
        );
    }

    #[test]
    fn test_pick_off_with_error_and_with_putout() {
        assert_eq!(
            parse("PO1(E3)").basic,
            BasicPlay::Baserunning(Baserunning::PickOff {
                base: Base::First,
                fielding: Fielding::Error(FieldingError {
                    thrower: None,
                    fielder: Fielder::FirstBaseman,
                    throwing: false,
                }),
            })
        );
        assert_eq!(
            parse("PO2(14)").basic,
            BasicPlay::Baserunning(Baserunning::PickOff {
                base: Base::Second,
                fielding: Fielding::Assists(chain("14")),
            })
        );
    }

    #[test]
    fn test_double_steal_needs_two_bases() {
        assert_eq!(
            parse("SB3;SB2").basic,
            BasicPlay::Baserunning(Baserunning::DoubleSteal {
                bases: vec![Base::Third, Base::Second]
            })
        );
        assert_eq!(
            parse("SB2").basic,
            BasicPlay::Baserunning(Baserunning::StolenBase { base: Base::Second })
        );
    }

    #[test]
    fn test_strikeout_with_add_ons() {
        assert_eq!(
            parse("K+SB2").basic,
            BasicPlay::Strikeout {
                baserunning: vec![Baserunning::StolenBase { base: Base::Second }]
            }
        );
        assert_eq!(
            parse("K").basic,
            BasicPlay::Strikeout {
                baserunning: vec![]
            }
        );
    }

    #[test]
    fn test_intentional_walk_spellings() {
        let expected = BasicPlay::IntentionalWalk {
            baserunning: vec![],
        };
        assert_eq!(parse("IW").basic, expected);
        assert_eq!(parse("I").basic, expected);
    }

    #[test]
    fn test_error_with_throwing_flag() {
        assert_eq!(
            parse("E6/TH").basic,
            BasicPlay::Error(FieldingError {
                thrower: None,
                fielder: Fielder::Shortstop,
                throwing: true,
            })
        );
        assert_eq!(
            parse("5E3").basic,
            BasicPlay::Error(FieldingError {
                thrower: Some(Fielder::ThirdBaseman),
                fielder: Fielder::FirstBaseman,
                throwing: false,
            })
        );
    }

    #[test]
    fn test_error_with_ground_ball_modifier() {
        let play = parse("E6/G6");
        assert_eq!(play.modifiers.len(), 1);
        assert_eq!(play.modifiers[0].kind, ModifierKind::GroundBall);
        let location = play.modifiers[0].location.as_ref().expect("location");
        assert_eq!(location.zones, vec![Zone::Fielder(Fielder::Shortstop)]);
    }

    #[test]
    fn test_hit_location_descriptor() {
        let play = parse("D7/L78XD");
        let location = play.modifiers[0].location.clone().expect("location");
        assert_eq!(play.modifiers[0].kind, ModifierKind::LineDrive);
        assert_eq!(
            location,
            HitLocation {
                zones: vec![
                    Zone::Fielder(Fielder::LeftFielder),
                    Zone::Fielder(Fielder::CenterFielder)
                ],
                toward_line: false,
                severity: Some(Severity::Extra),
                depth: Some(Depth::Deep),
                foul: false,
                contact: None,
            }
        );

        let play = parse("9/F9LSF");
        let location = play.modifiers[0].location.clone().expect("location");
        assert!(location.toward_line);
        assert!(location.foul);
        assert_eq!(location.depth, Some(Depth::Shallow));
    }

    #[test]
    fn test_zero_is_unknown_location_not_a_fielder() {
        let play = parse("63/G0");
        let location = play.modifiers[0].location.as_ref().expect("location");
        assert_eq!(location.zones, vec![Zone::Unknown]);
    }

    #[test]
    fn test_multiple_modifiers_and_advancements() {
        let play = parse("S9/L9S.2-H;1-3");
        assert_eq!(play.modifiers.len(), 1);
        assert_eq!(
            play.advancements,
            vec![
                Advancement::Successful {
                    from: Base::Second,
                    to: Base::home(),
                    error: None
                },
                Advancement::Successful {
                    from: Base::First,
                    to: Base::Third,
                    error: None
                },
            ]
        );
    }

    #[test]
    fn test_home_run_with_runners() {
        let play = parse("HR.2-H;1-H");
        assert_eq!(play.basic, BasicPlay::Hit(Hit::HomeRun));
        assert_eq!(play.advancements.len(), 2);
        assert!(play.advancements.iter().all(|a| a.to().is_home()));
    }

    #[test]
    fn test_home_annotations_are_captured() {
        let play = parse("S8.3-H(UR)(NR);B-1");
        assert_eq!(
            play.advancements[0].to(),
            &Base::Home {
                annotations: vec![RunAnnotation::UnearnedRun, RunAnnotation::NoRbiCredited]
            }
        );
        assert_eq!(play.advancements[1].from(), &Base::home());
    }

    #[test]
    fn test_failed_advancement_with_putout_chain() {
        let play = parse("S7.2XH(72)");
        assert_eq!(
            play.advancements,
            vec![Advancement::Failed {
                from: Base::Second,
                to: Base::home(),
                fielding: Some(Fielding::Assists(chain("72"))),
            }]
        );
    }

    #[test]
    fn test_failed_advancement_error_lands_on_home_annotations() {
        let play = parse("S7.2XH(E2)");
        let Advancement::Failed { to, fielding, .. } = &play.advancements[0] else {
            panic!("expected failed advancement");
        };
        assert!(fielding.is_none());
        assert_eq!(to.annotations().len(), 1);
    }

    #[test]
    fn test_remaining_basic_plays() {
        assert_eq!(
            parse("FLE5").basic,
            BasicPlay::ErrorOnFoulFly {
                fielder: Fielder::ThirdBaseman
            }
        );
        assert_eq!(parse("NP").basic, BasicPlay::NoPlay);
        assert_eq!(
            parse("BK").basic,
            BasicPlay::Baserunning(Baserunning::Balk)
        );
        assert_eq!(
            parse("PB").basic,
            BasicPlay::Baserunning(Baserunning::PassedBall)
        );
        assert_eq!(
            parse("DI").basic,
            BasicPlay::Baserunning(Baserunning::DefensiveIndifference)
        );
        assert_eq!(
            parse("FC5").basic,
            BasicPlay::FieldersChoice {
                fielders: Some(chain("5"))
            }
        );
        assert_eq!(
            parse("FC").basic,
            BasicPlay::FieldersChoice { fielders: None }
        );
        assert_eq!(
            parse("C/E2").basic,
            BasicPlay::Interference {
                fielder: Fielder::Catcher
            }
        );
        assert_eq!(parse("DGR").basic, BasicPlay::Hit(Hit::GroundRuleDouble));
        assert_eq!(
            parse("T9").basic,
            BasicPlay::Hit(Hit::Triple {
                fielders: chain("9")
            })
        );
        assert_eq!(
            parse("W").basic,
            BasicPlay::Walk {
                baserunning: vec![]
            }
        );
    }

    #[test]
    fn test_throw_modifiers() {
        let play = parse("54(1)/FO/TH2");
        assert_eq!(play.modifiers[0].kind, ModifierKind::ForceOut);
        assert_eq!(play.modifiers[1].kind, ModifierKind::ThrowTo(Base::Second));
    }

    #[test]
    fn test_unknown_code_fails_at_first_column() {
        let failure = parse_play("Q9").unwrap_err();
        assert_eq!(failure.input, "Q9");
        assert_eq!(failure.column, 1);
        assert!(!failure.expected.is_empty());
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        let failure = parse_play("S7!").unwrap_err();
        assert!(failure.column >= 3, "column was {}", failure.column);
        assert!(!failure.expected.is_empty());
    }

    #[test]
    fn test_zero_is_not_a_fielder() {
        assert!(parse_play("S0").is_err());
    }
}
