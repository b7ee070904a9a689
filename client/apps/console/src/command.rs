//! Console command parsing

use anyhow::{Context, bail};
use kernel::id::UserId;
use wallet::domain::leaderboard::LeaderboardSort;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SignIn {
        user_id: UserId,
        email: Option<String>,
    },
    SignOut,
    Go(String),
    Verify(String),
    Setup {
        pin: String,
        confirm: String,
    },
    Dismiss,
    Status,
    Balance,
    TopUp {
        amount: String,
    },
    Withdraw {
        amount: String,
        phone: String,
    },
    Send {
        amount: String,
        recipient: String,
    },
    Contribute {
        amount: String,
    },
    Leaderboard(LeaderboardSort),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  signin <uuid> [email]     sign in as a member
  signout                   sign out
  go <path>                 navigate
  verify <pin>              answer the verification prompt
  setup <pin> <confirm>     create a PIN
  dismiss                   close the open PIN prompt
  status                    show gate state
  balance                   show wallet balances
  topup <amount>            top up savings
  withdraw <amount> <phone> withdraw from the MGR wallet
  send <amount> <member>    send from the MGR wallet
  contribute <amount>       make a contribution
  leaderboard [order]       rank members (most_contributing, top_saver,
                            ascending, descending, alphabetical)
  quit";

/// Parse one input line; `None` for a blank line
pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("signin", [id]) | ("signin", [id, _]) => Command::SignIn {
            user_id: id.parse::<UserId>().context("user id must be a UUID")?,
            email: args.get(1).map(|e| e.to_string()),
        },
        ("signout", []) => Command::SignOut,
        ("go", [path]) => Command::Go(path.to_string()),
        ("verify", [pin]) => Command::Verify(pin.to_string()),
        ("setup", [pin, confirm]) => Command::Setup {
            pin: pin.to_string(),
            confirm: confirm.to_string(),
        },
        ("dismiss", []) => Command::Dismiss,
        ("status", []) => Command::Status,
        ("balance", []) => Command::Balance,
        ("topup", [amount]) => Command::TopUp {
            amount: amount.to_string(),
        },
        ("withdraw", [amount, phone]) => Command::Withdraw {
            amount: amount.to_string(),
            phone: phone.to_string(),
        },
        ("send", [amount, recipient]) => Command::Send {
            amount: amount.to_string(),
            recipient: recipient.to_string(),
        },
        ("contribute", [amount]) => Command::Contribute {
            amount: amount.to_string(),
        },
        ("leaderboard", []) => Command::Leaderboard(LeaderboardSort::default()),
        ("leaderboard", [order]) => Command::Leaderboard(order.parse()?),
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => bail!("unknown command or wrong arguments: {other} (try `help`)"),
    };

    Ok(Some(command))
}
