use braid::{match_sum, Sum};

#[derive(Debug, PartialEq)]
struct Small(u32);

#[derive(Debug, PartialEq)]
struct Big(u64);

#[derive(Debug, PartialEq)]
struct Words(&'static str);

#[derive(Debug, PartialEq)]
struct Nothing;

fn classify(s: Sum![Small, Big, Words]) -> u64 {
    match_sum!(s {
        Small(n) => u64::from(n),
        Big(n) if n > 1_000 => n / 2,
        Big(n) => n,
        Words(w) => w.len() as u64,
    })
}

#[test]
fn dispatches_by_variant_type() {
    assert_eq!(classify(Sum::new(Small(7))), 7);
    assert_eq!(classify(Sum::new(Words("four"))), 4);
}

#[test]
fn guards_fall_through_to_later_arms() {
    assert_eq!(classify(Sum::new(Big(2_000))), 1_000);
    assert_eq!(classify(Sum::new(Big(10))), 10);
}

#[test]
fn binds_the_whole_variant() {
    let s: Sum![Small, Big] = Sum::new(Small(3));
    let got = match_sum!(s {
        whole @ Small(_) => whole.0 + 1,
        Big(_) => 0,
    });
    assert_eq!(got, 4);
}

#[test]
fn unit_variants_match_by_name() {
    let s: Sum![Nothing, Small] = Sum::new(Nothing);
    let got = match_sum!(s {
        Nothing => 0,
        Small(n) => n,
    });
    assert_eq!(got, 0);
}

#[test]
fn wildcard_takes_the_rest() {
    let s: Sum![Small, Big, Words] = Sum::new(Words("x"));
    let got = match_sum!(s {
        Small(n) => n,
        _ => 99,
    });
    assert_eq!(got, 99);
}

#[test]
fn or_patterns_share_one_body() {
    let s: Sum![Small, Big] = Sum::new(Big(5));
    let got = match_sum!(s {
        Small(n) => u64::from(n),
        Big(n) => n,
    });
    assert_eq!(got, 5);

    let s: Sum![Small, Big] = Sum::new(Small(6));
    let got = match_sum!(s {
        Small(_) | Big(_) => 1u64,
    });
    assert_eq!(got, 1);
}
