use std::fmt::Debug;

use crate::actor::Id;
use crate::value::Value;

/// Decides what a general actually tells a given recipient.
///
/// Implementations must be deterministic: the same inputs always yield the
/// same output, so simulations can be replayed exactly.
pub trait FaultInjector: Clone + Debug {
    /// The value a faulty general sends to `recipient` in place of `true_value`.
    fn corrupt(&self, true_value: Value, recipient: Id) -> Value;

    /// Honest generals relay faithfully, faulty ones go through `corrupt`.
    fn transmit(&self, true_value: Value, sender_is_faulty: bool, recipient: Id) -> Value {
        if sender_is_faulty {
            self.corrupt(true_value, recipient)
        } else {
            true_value
        }
    }
}

/// Tells even-numbered generals to attack and odd-numbered ones to retreat,
/// whatever it was told itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParityLiar;

impl FaultInjector for ParityLiar {
    fn corrupt(&self, _true_value: Value, recipient: Id) -> Value {
        if recipient % 2 == 0 {
            Value::Attack
        } else {
            Value::Retreat
        }
    }
}

/// Always relays the opposite of what it was told.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inverter;

impl FaultInjector for Inverter {
    fn corrupt(&self, true_value: Value, _recipient: Id) -> Value {
        true_value.opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_parity_liar_ignores_true_value() {
        for value in vec![Value::Attack, Value::Retreat] {
            assert_eq!(ParityLiar.transmit(value, true, 0), Value::Attack);
            assert_eq!(ParityLiar.transmit(value, true, 1), Value::Retreat);
            assert_eq!(ParityLiar.transmit(value, true, 4), Value::Attack);
        }
    }

    #[test]
    fn test_inverter_flips() {
        assert_eq!(Inverter.transmit(Value::Attack, true, 3), Value::Retreat);
        assert_eq!(Inverter.transmit(Value::Retreat, true, 3), Value::Attack);
    }

    quickcheck! {
        fn prop_honest_senders_relay_faithfully(attack: bool, recipient: usize) -> bool {
            let value = if attack { Value::Attack } else { Value::Retreat };
            ParityLiar.transmit(value, false, recipient) == value
                && Inverter.transmit(value, false, recipient) == value
        }

        fn prop_parity_liar_depends_only_on_recipient(recipient: usize) -> bool {
            ParityLiar.transmit(Value::Attack, true, recipient)
                == ParityLiar.transmit(Value::Retreat, true, recipient)
        }
    }
}
