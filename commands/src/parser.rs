use crate::amount::parse_amount;
use crate::normalize::{clean, normalize};
use once_cell::sync::Lazy;
use regex::Regex;
use shared_types::{BillStatus, CategoryKind};

static RECORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\*)?\s*(\+)?\s*(\d[\d.,]*)(?:\s+(.+))?$").expect("record pattern")
});

static TRANSFER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^transferir\s+(\S+)\s+(?:da|do|de)\s+(.+?)\s+para\s+(.+)$")
        .expect("transfer pattern")
});

static CONTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^guardar\s+(\S+)\s+(.+)$").expect("contribute pattern"));

static WITHDRAW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^sacar\s+(\S+)\s+(.+?)\s+para\s+(.+)$").expect("withdraw pattern")
});

static PAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^pagar\s+(.+)$").expect("pay pattern"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

/// Usage hints sent back when a command keyword is recognized but its
/// arguments are not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Record,
    Transfer,
    Contribute,
    Withdraw,
    Pay,
    View,
}

impl Usage {
    pub fn text(&self) -> &'static str {
        match self {
            Usage::Record => "Use: <valor> <categoria> [descrição] ou + <valor> <categoria> [descrição]",
            Usage::Transfer => "Use: transferir <valor> da <conta origem> para <conta destino>",
            Usage::Contribute => "Use: guardar <valor> <meta>",
            Usage::Withdraw => "Use: sacar <valor> <meta> para <categoria de renda>",
            Usage::Pay => "Use: pagar <conta agendada>",
            Usage::View => {
                "Use: ver categorias | ver orçamentos [categoria] | ver contas [pendentes|pagas] | \
                 ver gastos hoje [categorizado] | ver hoje | ver saldos | ver metas"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    ListCategories,
    ListBudgets { category: Option<String> },
    /// `None` lists every bill of the month
    ListBills { filter: Option<BillStatus> },
    TodaySpending { by_category: bool },
    DailyAllowance,
    ListAccounts,
    ListGoals,
    PayBill { name: String },
    Transfer { amount: f64, from: String, to: String },
    Contribute { amount: f64, goal: String },
    Withdraw { amount: f64, goal: String, category: String },
    /// Expense or income; `rest` holds the category followed by an optional description
    Record { kind: CategoryKind, quick: bool, amount: f64, rest: String },
    Email(String),
    Invalid { usage: Usage },
    Unknown,
}

/// Parses one chat message into a command
pub fn parse(text: &str) -> Command {
    let text = clean(text);
    let folded = normalize(&text);
    let words: Vec<&str> = folded.split(' ').collect();

    match words.first().copied().unwrap_or_default() {
        "" => Command::Unknown,
        w if is_slash(w, "start") => Command::Start,
        w if is_slash(w, "ajuda") || is_slash(w, "help") || w == "ajuda" => Command::Help,
        "ver" => parse_view(&text, &words),
        "pagar" => match PAY.captures(&text) {
            Some(caps) => Command::PayBill {
                name: caps[1].to_string(),
            },
            None => Command::Invalid { usage: Usage::Pay },
        },
        "transferir" => parse_transfer(&text),
        "guardar" => parse_contribute(&text),
        "sacar" => parse_withdraw(&text),
        _ if EMAIL.is_match(&text) => Command::Email(text.to_lowercase()),
        w if w.starts_with(|c: char| c == '*' || c == '+' || c.is_ascii_digit()) => {
            parse_record(&text)
        }
        _ => Command::Unknown,
    }
}

fn is_slash(word: &str, name: &str) -> bool {
    match word.strip_prefix('/') {
        Some(rest) => rest == name || rest.split('@').next() == Some(name),
        None => false,
    }
}

fn parse_view(text: &str, words: &[&str]) -> Command {
    let args = &words[1..];
    match args {
        ["categorias"] | ["categoria"] => Command::ListCategories,
        ["orcamentos"] | ["orcamento"] => Command::ListBudgets { category: None },
        ["orcamentos" | "orcamento", ..] => {
            let category = text.splitn(3, ' ').nth(2).unwrap_or_default().to_string();
            Command::ListBudgets {
                category: Some(category),
            }
        }
        ["contas"] => Command::ListBills { filter: None },
        ["contas", "pendentes" | "pendente"] => Command::ListBills {
            filter: Some(BillStatus::Pending),
        },
        ["contas", "pagas" | "paga"] => Command::ListBills {
            filter: Some(BillStatus::Paid),
        },
        ["gastos", "hoje"] => Command::TodaySpending { by_category: false },
        ["gastos", "hoje", "categorizado" | "categorizados"] => {
            Command::TodaySpending { by_category: true }
        }
        ["hoje"] => Command::DailyAllowance,
        ["saldo"] | ["saldos"] => Command::ListAccounts,
        ["metas"] | ["meta"] => Command::ListGoals,
        _ => Command::Invalid { usage: Usage::View },
    }
}

fn parse_transfer(text: &str) -> Command {
    let invalid = Command::Invalid {
        usage: Usage::Transfer,
    };
    let Some(caps) = TRANSFER.captures(text) else {
        return invalid;
    };
    match parse_amount(&caps[1]) {
        Some(amount) => Command::Transfer {
            amount,
            from: caps[2].to_string(),
            to: caps[3].to_string(),
        },
        None => invalid,
    }
}

fn parse_contribute(text: &str) -> Command {
    let invalid = Command::Invalid {
        usage: Usage::Contribute,
    };
    let Some(caps) = CONTRIBUTE.captures(text) else {
        return invalid;
    };
    match parse_amount(&caps[1]) {
        Some(amount) => Command::Contribute {
            amount,
            goal: caps[2].to_string(),
        },
        None => invalid,
    }
}

fn parse_withdraw(text: &str) -> Command {
    let invalid = Command::Invalid {
        usage: Usage::Withdraw,
    };
    let Some(caps) = WITHDRAW.captures(text) else {
        return invalid;
    };
    match parse_amount(&caps[1]) {
        Some(amount) => Command::Withdraw {
            amount,
            goal: caps[2].to_string(),
            category: caps[3].to_string(),
        },
        None => invalid,
    }
}

fn parse_record(text: &str) -> Command {
    let invalid = Command::Invalid {
        usage: Usage::Record,
    };
    let Some(caps) = RECORD.captures(text) else {
        return invalid;
    };

    let quick = caps.get(1).is_some();
    let kind = if caps.get(2).is_some() {
        CategoryKind::Income
    } else {
        CategoryKind::Expense
    };

    let (Some(amount), Some(rest)) = (parse_amount(&caps[3]), caps.get(4)) else {
        return invalid;
    };

    Command::Record {
        kind,
        quick,
        amount,
        rest: rest.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> (CategoryKind, bool, f64, String) {
        match parse(text) {
            Command::Record {
                kind,
                quick,
                amount,
                rest,
            } => (kind, quick, amount, rest),
            other => panic!("expected record for {:?}, got {:?}", text, other),
        }
    }

    #[test]
    fn test_expense() {
        let (kind, quick, amount, rest) = record("15,50 alimentação almoço com a equipe");
        assert_eq!(kind, CategoryKind::Expense);
        assert!(!quick);
        assert_eq!(amount, 15.5);
        assert_eq!(rest, "alimentação almoço com a equipe");
    }

    #[test]
    fn test_income_and_quick_prefixes() {
        let (kind, quick, amount, rest) = record("+ 1200 salário adiantamento");
        assert_eq!((kind, quick, amount), (CategoryKind::Income, false, 1200.0));
        assert_eq!(rest, "salário adiantamento");

        let (kind, quick, amount, _) = record("* 5,50 café");
        assert_eq!((kind, quick, amount), (CategoryKind::Expense, true, 5.5));

        let (kind, quick, amount, rest) = record("*+ 100 presente de aniversário");
        assert_eq!((kind, quick, amount), (CategoryKind::Income, true, 100.0));
        assert_eq!(rest, "presente de aniversário");

        let (kind, quick, _, _) = record("*+100 presente");
        assert_eq!((kind, quick), (CategoryKind::Income, true));
    }

    #[test]
    fn test_record_without_category_is_invalid() {
        assert_eq!(parse("* 5,50"), Command::Invalid { usage: Usage::Record });
        assert_eq!(parse("0 café"), Command::Invalid { usage: Usage::Record });
        assert_eq!(parse("0,004 café"), Command::Invalid { usage: Usage::Record });
    }

    #[test]
    fn test_transfer() {
        assert_eq!(
            parse("transferir 100 da nubank para carteira"),
            Command::Transfer {
                amount: 100.0,
                from: "nubank".to_string(),
                to: "carteira".to_string(),
            }
        );
        assert_eq!(
            parse("Transferir 50,25 do Banco do Brasil para Poupança Casa"),
            Command::Transfer {
                amount: 50.25,
                from: "Banco do Brasil".to_string(),
                to: "Poupança Casa".to_string(),
            }
        );
        assert_eq!(
            parse("transferir cem da nubank para carteira"),
            Command::Invalid { usage: Usage::Transfer }
        );
    }

    #[test]
    fn test_goal_commands() {
        assert_eq!(
            parse("guardar 50 fundo de emergência"),
            Command::Contribute {
                amount: 50.0,
                goal: "fundo de emergência".to_string(),
            }
        );
        assert_eq!(
            parse("sacar 200 fundo de emergência para renda extra"),
            Command::Withdraw {
                amount: 200.0,
                goal: "fundo de emergência".to_string(),
                category: "renda extra".to_string(),
            }
        );
        assert_eq!(parse("sacar 200 viagem"), Command::Invalid { usage: Usage::Withdraw });
        assert_eq!(parse("guardar"), Command::Invalid { usage: Usage::Contribute });
    }

    #[test]
    fn test_pay_bill() {
        assert_eq!(
            parse("pagar aluguel"),
            Command::PayBill {
                name: "aluguel".to_string()
            }
        );
        assert_eq!(parse("pagar"), Command::Invalid { usage: Usage::Pay });
    }

    #[test]
    fn test_view_commands() {
        assert_eq!(parse("ver categorias"), Command::ListCategories);
        assert_eq!(parse("Ver Orçamentos"), Command::ListBudgets { category: None });
        assert_eq!(
            parse("ver orçamento alimentação"),
            Command::ListBudgets {
                category: Some("alimentação".to_string())
            }
        );
        assert_eq!(parse("ver contas"), Command::ListBills { filter: None });
        assert_eq!(
            parse("ver contas pendentes"),
            Command::ListBills {
                filter: Some(BillStatus::Pending)
            }
        );
        assert_eq!(
            parse("ver contas pagas"),
            Command::ListBills {
                filter: Some(BillStatus::Paid)
            }
        );
        assert_eq!(parse("ver gastos hoje"), Command::TodaySpending { by_category: false });
        assert_eq!(
            parse("ver gastos hoje categorizado"),
            Command::TodaySpending { by_category: true }
        );
        assert_eq!(parse("ver hoje"), Command::DailyAllowance);
        assert_eq!(parse("ver saldos"), Command::ListAccounts);
        assert_eq!(parse("ver metas"), Command::ListGoals);
        assert_eq!(parse("ver tudo"), Command::Invalid { usage: Usage::View });
    }

    #[test]
    fn test_start_help_email_unknown() {
        assert_eq!(parse("/start"), Command::Start);
        assert_eq!(parse("/start@oikonomos_bot"), Command::Start);
        assert_eq!(parse("ajuda"), Command::Help);
        assert_eq!(parse("/help"), Command::Help);
        assert_eq!(
            parse(" Ana@Example.com "),
            Command::Email("ana@example.com".to_string())
        );
        assert_eq!(parse("bom dia"), Command::Unknown);
        assert_eq!(parse("   "), Command::Unknown);
    }
}
