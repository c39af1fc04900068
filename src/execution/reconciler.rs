use crate::models::{Direction, Position};

/// How an entry intent interacts with an existing position on the same
/// symbol
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Held direction contradicts a confirmed opposite signal: close
    /// the position and open nothing this cycle (close-then-wait)
    CloseExisting { position_id: u64 },
    /// Position stays; any new Open for the symbol is suppressed
    KeepExisting,
    /// No position on this symbol; an Open may proceed
    NoPosition,
}

/// Compare the fused entry intent against the symbol's open position.
///
/// At most one position per symbol: an agreeing or unopposed position
/// suppresses stacking, an opposed one is closed without an immediate
/// reopen.
pub fn reconcile(existing: Option<&Position>, intent: Option<Direction>) -> Reconciliation {
    match existing {
        None => Reconciliation::NoPosition,
        Some(position) => match intent {
            Some(direction) if direction == position.direction.opposite() => {
                Reconciliation::CloseExisting {
                    position_id: position.id,
                }
            }
            _ => Reconciliation::KeepExisting,
        },
    }
}
