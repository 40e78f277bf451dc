//! Economy: balance changes and the append-only transaction log.
//!
//! Every money movement is recorded as an immutable `Transaction`; the log is
//! append-only and entries are never edited after creation. Categories are
//! inferred from the description with a keyword table and a default fallback,
//! never left unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::ids::TransactionId;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    Food,
    Lodging,
    Shopping,
    Travel,
    Work,
    Reward,
    Misc,
}

/// One immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub location_name: String,
}

// Keyword tables are matched in order against the lowercased description;
// the first hit wins.
const EXPENSE_KEYWORDS: &[(&str, TransactionCategory)] = &[
    ("achat", TransactionCategory::Shopping),
    ("boutique", TransactionCategory::Shopping),
    ("marché", TransactionCategory::Shopping),
    ("repas", TransactionCategory::Food),
    ("nourriture", TransactionCategory::Food),
    ("taverne", TransactionCategory::Food),
    ("restaurant", TransactionCategory::Food),
    ("auberge", TransactionCategory::Lodging),
    ("chambre", TransactionCategory::Lodging),
    ("logement", TransactionCategory::Lodging),
    ("passage", TransactionCategory::Travel),
    ("caravane", TransactionCategory::Travel),
    ("transport", TransactionCategory::Travel),
];

const INCOME_KEYWORDS: &[(&str, TransactionCategory)] = &[
    ("travail", TransactionCategory::Work),
    ("salaire", TransactionCategory::Work),
    ("paie", TransactionCategory::Work),
    ("quête", TransactionCategory::Reward),
    ("récompense", TransactionCategory::Reward),
    ("prime", TransactionCategory::Reward),
];

/// Infer a category from a free-form description. Falls back to `Misc`.
pub fn infer_transaction_category(
    description: &str,
    transaction_type: TransactionType,
) -> TransactionCategory {
    let description = description.to_lowercase();
    let table = match transaction_type {
        TransactionType::Expense => EXPENSE_KEYWORDS,
        TransactionType::Income => INCOME_KEYWORDS,
    };
    table
        .iter()
        .find(|(keyword, _)| description.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(TransactionCategory::Misc)
}

/// Apply a balance change and append the matching ledger entry in one step.
///
/// A zero amount is a warning-level no-op; the log never records empty
/// movements.
pub fn handle_money_change(
    player: &Player,
    amount: f64,
    description: &str,
    timestamp: DateTime<Utc>,
) -> (Player, Vec<GameEvent>) {
    if amount == 0.0 {
        tracing::warn!(description, "Ignoring zero-amount money change");
        return (player.clone(), Vec::new());
    }

    let transaction_type = if amount < 0.0 {
        TransactionType::Expense
    } else {
        TransactionType::Income
    };

    let transaction = Transaction {
        id: TransactionId::new(),
        amount,
        transaction_type,
        category: infer_transaction_category(description, transaction_type),
        description: description.to_string(),
        timestamp,
        location_name: player.location.name.clone(),
    };

    let mut next = player.clone();
    next.money += amount;
    let event = GameEvent::MoneyChanged {
        transaction_id: transaction.id,
        amount,
        new_balance: next.money,
    };
    next.transaction_log.push(transaction);

    (next, vec![event])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerLocation;

    fn player_with_money(money: f64) -> Player {
        let mut p = Player::new("Isabeau", PlayerLocation::named("Rouen"));
        p.money = money;
        p
    }

    #[test]
    fn expense_appends_transaction_and_decreases_balance() {
        let player = player_with_money(50.0);
        let (next, events) = handle_money_change(&player, -12.5, "Achat de billet", Utc::now());
        assert_eq!(next.money, 37.5);
        assert_eq!(next.transaction_log.len(), 1);
        let tx = &next.transaction_log[0];
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.category, TransactionCategory::Shopping);
        assert_eq!(tx.amount, -12.5);
        assert_eq!(tx.location_name, "Rouen");
        assert!(matches!(events[0], GameEvent::MoneyChanged { new_balance, .. } if new_balance == 37.5));
    }

    #[test]
    fn income_uses_income_keyword_table() {
        let player = player_with_money(0.0);
        let (next, _) = handle_money_change(&player, 30.0, "Salaire de la semaine", Utc::now());
        let tx = &next.transaction_log[0];
        assert_eq!(tx.transaction_type, TransactionType::Income);
        assert_eq!(tx.category, TransactionCategory::Work);
    }

    #[test]
    fn unmatched_description_falls_back_to_misc() {
        let player = player_with_money(0.0);
        let (next, _) = handle_money_change(&player, -3.0, "Pari perdu", Utc::now());
        assert_eq!(next.transaction_log[0].category, TransactionCategory::Misc);
    }

    #[test]
    fn zero_amount_is_a_noop() {
        let player = player_with_money(10.0);
        let (next, events) = handle_money_change(&player, 0.0, "rien", Utc::now());
        assert_eq!(next, player);
        assert!(events.is_empty());
    }
}
