use crate::value::Value;

/// Returns the value held by strictly more than half of `values`.
///
/// Ties and empty input resolve to [`Value::DEFAULT`]. Every general applies
/// the same fallback, which is what keeps honest generals in agreement when
/// their inputs split evenly.
pub fn majority<I: IntoIterator<Item = Value>>(values: I) -> Value {
    let (mut attack, mut retreat) = (0usize, 0usize);
    for value in values {
        match value {
            Value::Attack => attack += 1,
            Value::Retreat => retreat += 1,
        }
    }

    let total = attack + retreat;
    if 2 * attack > total {
        Value::Attack
    } else if 2 * retreat > total {
        Value::Retreat
    } else {
        Value::DEFAULT
    }
}
