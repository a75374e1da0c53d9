use crate::date::weekday_from_index;
use crate::shared::entity::ID;
use chrono::Weekday;
use thiserror::Error;

/// Longest relative reminder offered through a snooze button, in hours.
/// Matches the 7 day ceiling of the reminder scheduler.
const MAX_SNOOZE_HOURS: i64 = 7 * 24;

/// Action encoded in the `callback_data` of an inline button. Chat
/// platforms cap that field at a few dozen bytes, hence the short
/// prefix encoding. Tokens are parsed exactly once at the transport
/// boundary; business logic only ever sees this enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// `p_{id}` - mark paid/done
    MarkDone(ID),
    /// `u_{id}` - revert a completed document
    Undo(ID),
    /// `r_{id}` - open the weekday picker
    BeginReminder(ID),
    /// `rd_{id}_{day}` - weekday chosen, open the hour picker
    ChooseDay(ID, Weekday),
    /// `dt_{id}_{day}_{hour}` - hour chosen, arm the reminder
    ChooseHour(ID, Weekday, u32),
    /// `s_{id}_{hours}` - re-arm relative to now
    Snooze(ID, i64),
    /// `goto_{id}` - jump hint on fallback reminder messages
    JumpToOriginal(ID),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidCallbackToken {
    #[error("Callback token is malformed: `{0}`")]
    Malformed(String),
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        match self {
            Self::MarkDone(id) => format!("p_{}", id),
            Self::Undo(id) => format!("u_{}", id),
            Self::BeginReminder(id) => format!("r_{}", id),
            Self::ChooseDay(id, day) => format!("rd_{}_{}", id, day.number_from_monday()),
            Self::ChooseHour(id, day, hour) => {
                format!("dt_{}_{}_{}", id, day.number_from_monday(), hour)
            }
            Self::Snooze(id, hours) => format!("s_{}_{}", id, hours),
            Self::JumpToOriginal(id) => format!("goto_{}", id),
        }
    }

    pub fn parse(token: &str) -> Result<Self, InvalidCallbackToken> {
        let malformed = || InvalidCallbackToken::Malformed(token.to_string());
        let parts: Vec<&str> = token.split('_').collect();

        let id = |raw: &str| raw.parse::<ID>().map_err(|_| malformed());

        match parts.as_slice() {
            ["p", raw_id] => Ok(Self::MarkDone(id(raw_id)?)),
            ["u", raw_id] => Ok(Self::Undo(id(raw_id)?)),
            ["r", raw_id] => Ok(Self::BeginReminder(id(raw_id)?)),
            ["goto", raw_id] => Ok(Self::JumpToOriginal(id(raw_id)?)),
            ["rd", raw_id, raw_day] => {
                let day = parse_weekday(raw_day).ok_or_else(malformed)?;
                Ok(Self::ChooseDay(id(raw_id)?, day))
            }
            ["dt", raw_id, raw_day, raw_hour] => {
                let day = parse_weekday(raw_day).ok_or_else(malformed)?;
                let hour = raw_hour
                    .parse::<u32>()
                    .ok()
                    .filter(|h| *h < 24)
                    .ok_or_else(malformed)?;
                Ok(Self::ChooseHour(id(raw_id)?, day, hour))
            }
            ["s", raw_id, raw_hours] => {
                let hours = raw_hours
                    .parse::<i64>()
                    .ok()
                    .filter(|h| (1..=MAX_SNOOZE_HOURS).contains(h))
                    .ok_or_else(malformed)?;
                Ok(Self::Snooze(id(raw_id)?, hours))
            }
            _ => Err(malformed()),
        }
    }
}

fn parse_weekday(raw: &str) -> Option<Weekday> {
    raw.parse::<u32>().ok().and_then(weekday_from_index)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_and_parse_are_inverse() {
        let id = ID::new(17);
        let actions = vec![
            CallbackAction::MarkDone(id.clone()),
            CallbackAction::Undo(id.clone()),
            CallbackAction::BeginReminder(id.clone()),
            CallbackAction::ChooseDay(id.clone(), Weekday::Wed),
            CallbackAction::ChooseHour(id.clone(), Weekday::Fri, 16),
            CallbackAction::Snooze(id.clone(), 2),
            CallbackAction::JumpToOriginal(id),
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.encode()), Ok(action));
        }
    }

    #[test]
    fn it_parses_the_short_wire_tokens() {
        assert_eq!(
            CallbackAction::parse("p_3"),
            Ok(CallbackAction::MarkDone(ID::new(3)))
        );
        assert_eq!(
            CallbackAction::parse("dt_3_1_10"),
            Ok(CallbackAction::ChooseHour(ID::new(3), Weekday::Mon, 10))
        );
    }

    #[test]
    fn it_rejects_malformed_tokens() {
        for bad in [
            "",
            "p_",
            "p_abc",
            "p_0",
            "x_3",
            "rd_3_0",   // no weekday index 0
            "rd_3_6",   // weekend is not offered
            "dt_3_1_24",
            "s_3_0",
            "s_3_200", // beyond the 7 day ceiling
            "p_3_4_5_6",
        ] {
            assert!(CallbackAction::parse(bad).is_err(), "accepted `{}`", bad);
        }
    }
}
