// Chat command parsing

/// Commands intercepted from the chat channel
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `/npcstatus`: list every NPC to the sender
    NpcStatus,
    /// `/dumpnpcs`: persist the NPC registry now
    DumpNpcs,
    /// `/missions`: list every mission to the sender
    Missions,
    /// `/mission <name> = <status>`
    SetMission { name: String, status: String },
    /// `/damage <name> <amount>`
    Damage { name: String, amount: f32 },
    /// `/revive <name>`
    Revive { name: String },
}

/// A recognised command with unusable arguments
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid damage amount '{0}'")]
    InvalidAmount(String),
}

const NPCSTATUS_USAGE: &str = "/npcstatus";
const DUMPNPCS_USAGE: &str = "/dumpnpcs";
const MISSIONS_USAGE: &str = "/missions";
const MISSION_USAGE: &str = "/mission <name> = <status>";
const DAMAGE_USAGE: &str = "/damage <name> <amount>";
const REVIVE_USAGE: &str = "/revive <name>";

/// Parse one chat line.
///
/// Returns `None` for anything that is not one of the known commands, so the
/// host can propagate it as ordinary chat.
///
/// # Examples
///
/// ```
/// use worldsync::command::{parse_command, Command};
///
/// assert_eq!(parse_command("/npcstatus"), Some(Ok(Command::NpcStatus)));
/// assert_eq!(
///     parse_command("/damage Default Goblin 25"),
///     Some(Ok(Command::Damage { name: "Default Goblin".to_string(), amount: 25.0 }))
/// );
/// assert_eq!(parse_command("hello there"), None);
/// ```
pub fn parse_command(text: &str) -> Option<Result<Command, CommandError>> {
    let text = text.trim();
    let (verb, args) = match text.split_once(char::is_whitespace) {
        Some((verb, args)) => (verb, args.trim()),
        None => (text, ""),
    };

    let parsed = match verb {
        "/npcstatus" => no_args(args, Command::NpcStatus, NPCSTATUS_USAGE),
        "/dumpnpcs" => no_args(args, Command::DumpNpcs, DUMPNPCS_USAGE),
        "/missions" => no_args(args, Command::Missions, MISSIONS_USAGE),
        "/mission" => parse_set_mission(args),
        "/damage" => parse_damage(args),
        "/revive" => {
            if args.is_empty() {
                Err(CommandError::Usage(REVIVE_USAGE))
            } else {
                Ok(Command::Revive {
                    name: args.to_string(),
                })
            }
        }
        _ => return None,
    };

    Some(parsed)
}

fn no_args(args: &str, command: Command, usage: &'static str) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage(usage))
    }
}

fn parse_set_mission(args: &str) -> Result<Command, CommandError> {
    let (name, status) = args
        .split_once('=')
        .map(|(name, status)| (name.trim(), status.trim()))
        .filter(|(name, status)| !name.is_empty() && !status.is_empty())
        .ok_or(CommandError::Usage(MISSION_USAGE))?;

    Ok(Command::SetMission {
        name: name.to_string(),
        status: status.to_string(),
    })
}

fn parse_damage(args: &str) -> Result<Command, CommandError> {
    // NPC names may contain spaces; the amount is always the last word
    let (name, amount) = args
        .rsplit_once(char::is_whitespace)
        .map(|(name, amount)| (name.trim(), amount))
        .filter(|(name, _)| !name.is_empty())
        .ok_or(CommandError::Usage(DAMAGE_USAGE))?;

    let amount = amount
        .parse::<f32>()
        .ok()
        .filter(|a| a.is_finite() && *a >= 0.0)
        .ok_or_else(|| CommandError::InvalidAmount(amount.to_string()))?;

    Ok(Command::Damage {
        name: name.to_string(),
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("/npcstatus"), Some(Ok(Command::NpcStatus)));
        assert_eq!(parse_command("/dumpnpcs"), Some(Ok(Command::DumpNpcs)));
        assert_eq!(parse_command("  /missions  "), Some(Ok(Command::Missions)));
    }

    #[test]
    fn test_parse_simple_command_with_args_is_usage_error() {
        assert_eq!(
            parse_command("/npcstatus now"),
            Some(Err(CommandError::Usage("/npcstatus")))
        );
    }

    #[test]
    fn test_parse_set_mission() {
        assert_eq!(
            parse_command("/mission Default Mission = In Progress"),
            Some(Ok(Command::SetMission {
                name: "Default Mission".to_string(),
                status: "In Progress".to_string(),
            }))
        );
    }

    #[test]
    fn test_parse_set_mission_malformed() {
        for text in ["/mission", "/mission Default Mission", "/mission = Done", "/mission Quest ="] {
            assert_eq!(
                parse_command(text),
                Some(Err(CommandError::Usage(MISSION_USAGE))),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_parse_damage() {
        assert_eq!(
            parse_command("/damage Goblin 12.5"),
            Some(Ok(Command::Damage {
                name: "Goblin".to_string(),
                amount: 12.5,
            }))
        );
    }

    #[test]
    fn test_parse_damage_malformed() {
        assert_eq!(
            parse_command("/damage 10"),
            Some(Err(CommandError::Usage(DAMAGE_USAGE)))
        );
        assert_eq!(
            parse_command("/damage Goblin lots"),
            Some(Err(CommandError::InvalidAmount("lots".to_string())))
        );
        assert_eq!(
            parse_command("/damage Goblin -5"),
            Some(Err(CommandError::InvalidAmount("-5".to_string())))
        );
    }

    #[test]
    fn test_parse_revive() {
        assert_eq!(
            parse_command("/revive Default Goblin"),
            Some(Ok(Command::Revive {
                name: "Default Goblin".to_string(),
            }))
        );
        assert_eq!(
            parse_command("/revive"),
            Some(Err(CommandError::Usage(REVIVE_USAGE)))
        );
    }

    #[test]
    fn test_ordinary_chat_is_not_a_command() {
        assert_eq!(parse_command("hello world"), None);
        assert_eq!(parse_command("/dance"), None);
        assert_eq!(parse_command(""), None);
    }
}
