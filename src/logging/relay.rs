//! Process-wide log event relay
//!
//! Every line logged through any install context is also broadcast to the
//! observers registered here, in registration order, on the caller's
//! thread. A host embeds the engine and subscribes to mirror install logs
//! into its own logging system. Delivery problems never propagate into the
//! install transaction.

use std::sync::{Mutex, OnceLock};

type Observer = Box<dyn Fn(&str) + Send>;

struct RelayState {
    next_token: u64,
    observers: Vec<(u64, Observer)>,
}

static RELAY: OnceLock<Mutex<RelayState>> = OnceLock::new();

fn relay() -> &'static Mutex<RelayState> {
    RELAY.get_or_init(|| {
        Mutex::new(RelayState {
            next_token: 0,
            observers: Vec::new(),
        })
    })
}

/// Identifies one subscription so it can be removed later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverToken(u64);

/// Registers an observer. Observers run synchronously on the logging thread
/// and must not panic.
pub fn subscribe(observer: impl Fn(&str) + Send + 'static) -> ObserverToken {
    let Ok(mut state) = relay().lock() else {
        return ObserverToken(u64::MAX);
    };
    let token = state.next_token;
    state.next_token += 1;
    state.observers.push((token, Box::new(observer)));
    ObserverToken(token)
}

/// Removes a subscription; unknown tokens are ignored
pub fn unsubscribe(token: ObserverToken) {
    if let Ok(mut state) = relay().lock() {
        state.observers.retain(|(t, _)| *t != token.0);
    }
}

/// Delivers one line to every observer in registration order. A poisoned
/// registry is treated as "no observers".
pub fn broadcast(line: &str) {
    if let Ok(state) = relay().lock() {
        for (_, observer) in &state.observers {
            observer(line);
        }
    }
}
