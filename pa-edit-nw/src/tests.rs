use crate::*;
use itertools::Itertools;
use pa_edit_types::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// Plain two-row DP without provenance, to cross-check distances.
fn reference_cost<T, C: CostModel<T>>(a: &[T], b: &[T], cm: &C) -> Cost {
    let mut prev = vec![0.0];
    for y in b {
        prev.push(prev[prev.len() - 1] + cm.ins_cost(y));
    }
    for x in a {
        let mut cur = vec![prev[0] + cm.del_cost(x)];
        for (j, y) in b.iter().enumerate() {
            let c = (prev[j] + cm.sub_cost(x, y))
                .min(prev[j + 1] + cm.del_cost(x))
                .min(cur[j] + cm.ins_cost(y));
            cur.push(c);
        }
        prev = cur;
    }
    prev[b.len()]
}

/// A random sequence over `alphabet` and a mutated copy of it.
fn random_pair(rng: &mut ChaCha8Rng, max_len: usize, alphabet: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let n = rng.gen_range(0..=max_len);
    let a = (0..n)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect_vec();
    let mut b = a.clone();
    for _ in 0..rng.gen_range(0..=3) {
        let c = alphabet[rng.gen_range(0..alphabet.len())];
        match rng.gen_range(0..3) {
            0 if !b.is_empty() => {
                let i = rng.gen_range(0..b.len());
                b[i] = c;
            }
            1 if !b.is_empty() => {
                b.remove(rng.gen_range(0..b.len()));
            }
            _ if b.len() < max_len => {
                b.insert(rng.gen_range(0..=b.len()), c);
            }
            _ => {}
        }
    }
    (a, b)
}

fn test_on_alphabet<C: CostModel<u8>>(cm: C, alphabet: &[u8]) {
    let rng = &mut ChaCha8Rng::seed_from_u64(31415);
    for _ in 0..200 {
        let (a, b) = random_pair(rng, 6, alphabet);
        let matrix = build(&a, &b, &cm).unwrap();
        let d = min_edit_distance(&matrix);
        assert_eq!(d, reference_cost(&a, &b, &cm), "{a:?} {b:?}");

        let best = align(&matrix, Mode::SingleBest).collect_vec();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].verify(&a, &b, &cm), d);
        assert_eq!(best[0].cost(), d);

        let all = align(&matrix, Mode::AllTies).collect_vec();
        assert_eq!(all.len() as u128, matrix.count_alignments(), "{a:?} {b:?}");
        assert_eq!(all[0], best[0]);
        for alignment in &all {
            assert_eq!(alignment.verify(&a, &b, &cm), d);
            assert!(a.len().max(b.len()) <= alignment.len());
            assert!(alignment.len() <= a.len() + b.len());
        }
        let distinct: FxHashSet<Vec<EditKind>> =
            all.iter().map(|al| al.kinds().collect()).collect();
        assert_eq!(distinct.len(), all.len());
    }
}

macro_rules! test_functions_macro {
    () => {
        #[test]
        fn classic_cost() {
            // sub=2, indel=1
            test(LinearCost::classic());
        }

        #[test]
        fn unit_cost() {
            // sub=indel=1
            test(LinearCost::unit());
        }

        #[test]
        fn linear_cost() {
            // sub=1, indel=2
            test(LinearCost::linear(1.0, 2.0));
        }

        #[test]
        fn linear_asymmetric_cost() {
            // sub=1, insert=2, deletion=3
            test(LinearCost::linear_asymmetric(1.0, 2.0, 3.0));
        }

        #[test]
        fn free_substitution_cost() {
            // sub=0, indel=1
            test(LinearCost::linear(0.0, 1.0));
        }

        #[test]
        fn fractional_cost() {
            test(
                FnCost::classic()
                    .with_ins(|c: &u8| if *c == b'A' { 0.2 } else { 1.0 })
                    .with_del(|c: &u8| if *c == b'C' { 0.3 } else { 1.0 })
                    .with_sub(|x: &u8, y: &u8| {
                        if x == y {
                            0.0
                        } else {
                            2f64.sqrt()
                        }
                    }),
            );
        }

        #[test]
        fn non_metric_cost() {
            // Equal elements do not align for free.
            test(
                FnCost::classic().with_sub(|x: &u8, y: &u8| if x == y { 0.5 } else { 1.5 }),
            );
        }
    };
}

mod binary_alphabet {
    use super::*;

    fn test<C: CostModel<u8>>(cm: C) {
        test_on_alphabet(cm, b"AC");
    }

    test_functions_macro!();
}

mod dna_alphabet {
    use super::*;

    fn test<C: CostModel<u8>>(cm: C) {
        test_on_alphabet(cm, b"ACGT");
    }

    test_functions_macro!();
}

#[test]
fn unit_cost_is_levenshtein() {
    let rng = &mut ChaCha8Rng::seed_from_u64(2718);
    let nw = NW::new(LinearCost::unit(), Mode::SingleBest);
    for _ in 0..100 {
        let (a, b) = random_pair(rng, 40, b"ACGT");
        assert_eq!(
            nw.cost(&a, &b).unwrap(),
            triple_accel::levenshtein(&a, &b) as Cost,
            "{a:?} {b:?}"
        );
    }
}

#[test]
fn base_cases() {
    let cm = FnCost::classic()
        .with_ins(|c: &char| if c.is_alphabetic() { 1.0 } else { 0.5 })
        .with_del(|c: &char| if c.is_alphabetic() { 1.5 } else { 0.25 });
    let a = chars("ab-");
    let b = chars("-x");

    let matrix = build(&a, &[], &cm).unwrap();
    assert_eq!(min_edit_distance(&matrix), 3.25);
    let all = align(&matrix, Mode::AllTies).collect_vec();
    assert_eq!(all.len(), 1);
    assert!(all[0].kinds().all(|k| k == EditKind::Del));

    let matrix = build(&[], &b, &cm).unwrap();
    assert_eq!(min_edit_distance(&matrix), 1.5);
    let all = align(&matrix, Mode::AllTies).collect_vec();
    assert_eq!(all.len(), 1);
    assert!(all[0].kinds().all(|k| k == EditKind::Ins));

    let matrix = build(&a, &b, &cm).unwrap();
    for i in 1..=a.len() {
        let cell = matrix.cell(i, 0);
        assert_eq!(cell.steps, Steps::single(Step::Del));
        assert_eq!(cell.cost, a[..i].iter().map(|x| cm.del_cost(x)).sum::<Cost>());
    }
    for j in 1..=b.len() {
        let cell = matrix.cell(0, j);
        assert_eq!(cell.steps, Steps::single(Step::Ins));
        assert_eq!(cell.cost, b[..j].iter().map(|y| cm.ins_cost(y)).sum::<Cost>());
    }
}

#[test]
fn both_empty() {
    let empty: [char; 0] = [];
    let matrix = build(&empty, &empty, &LinearCost::classic()).unwrap();
    assert_eq!(min_edit_distance(&matrix), 0.0);
    assert!(matrix.cell(0, 0).steps.is_empty());
    for mode in [Mode::SingleBest, Mode::AllTies] {
        let all = align(&matrix, mode).collect_vec();
        assert_eq!(all, vec![Alignment::new()]);
    }
    assert_eq!(matrix.count_alignments(), 1);
}

#[test]
fn equal_sequences_match() {
    let a = chars("alignment");
    let matrix = build(&a, &a, &LinearCost::classic()).unwrap();
    assert_eq!(min_edit_distance(&matrix), 0.0);
    for alignment in align(&matrix, Mode::AllTies) {
        assert!(alignment.kinds().all(|k| k == EditKind::Match));
        assert_eq!(alignment.len(), a.len());
    }
}

#[test]
fn match_is_independent_of_cost() {
    let cm = FnCost::classic().with_sub(|_: &char, _: &char| 1.0);
    let a = chars("aa");
    let matrix = build(&a, &a, &cm).unwrap();
    assert_eq!(min_edit_distance(&matrix), 2.0);
    let best = align(&matrix, Mode::SingleBest).next().unwrap();
    assert_eq!(best.cigar(), "2M");
}

#[test]
fn intention_execution() {
    let a = chars("intention");
    let b = chars("execution");
    let cm = LinearCost::classic();
    let matrix = build(&a, &b, &cm).unwrap();
    assert_eq!(min_edit_distance(&matrix), 8.0);

    let best = align(&matrix, Mode::SingleBest).next().unwrap();
    assert_eq!(best.cigar(), "1D2X1M1I1X4M");

    let all = align(&matrix, Mode::AllTies).collect_vec();
    assert_eq!(all.len(), 134);
    assert_eq!(matrix.count_alignments(), 134);
    assert_eq!(all[0], best);
    assert_eq!(all[1].cigar(), "1X1D1X1M1I1X4M");
    assert_eq!(all[2].cigar(), "1I2D1X1M1I1X4M");
    for alignment in &all {
        assert_eq!(alignment.verify(&a, &b, &cm), 8.0);
    }
}

#[test]
fn tied_predecessors() {
    let a = chars("ab");
    let b = chars("ba");
    let matrix = build(&a, &b, &LinearCost::classic()).unwrap();
    assert_eq!(
        matrix.cell(1, 1).steps,
        Steps::from_iter([Step::Sub, Step::Del, Step::Ins])
    );
    assert_eq!(
        matrix.cell(2, 2).steps,
        Steps::from_iter([Step::Del, Step::Ins])
    );
    assert_eq!(matrix.cell(2, 2).steps.first(), Some(Step::Del));
    assert_eq!(matrix.cell(1, 2).steps, Steps::single(Step::Sub));

    let all = align(&matrix, Mode::AllTies).map(|al| al.cigar()).collect_vec();
    assert_eq!(all, ["1I1M1D", "1D1M1I"]);
}

#[test]
fn matrix_table() {
    let a = chars("ab");
    let b = chars("ba");
    let matrix = build(&a, &b, &LinearCost::classic()).unwrap();
    assert_eq!(
        matrix.to_string(),
        "        b   a\n   0   ←1  ←2\na ↑1 ↖↑←2  ↖1\nb ↑2   ↖1 ↑←2"
    );
}

#[test]
fn deterministic() {
    let rng = &mut ChaCha8Rng::seed_from_u64(1);
    for _ in 0..20 {
        let (a, b) = random_pair(rng, 10, b"ACG");
        let cm = LinearCost::classic();
        let m1 = build(&a, &b, &cm).unwrap();
        let m2 = build(&a, &b, &cm).unwrap();
        for i in 0..=a.len() {
            for j in 0..=b.len() {
                assert_eq!(m1.cell(i, j), m2.cell(i, j));
            }
        }
        assert_eq!(
            align(&m1, Mode::SingleBest).collect_vec(),
            align(&m2, Mode::SingleBest).collect_vec()
        );
        assert_eq!(
            align(&m1, Mode::AllTies).collect_vec(),
            align(&m2, Mode::AllTies).collect_vec()
        );
    }
}

#[test]
fn negative_cost_fails_when_used() {
    let cm = LinearCost::new(2.0, -1.0, 1.0);
    let a = chars("abc");
    let err = build(&a, &chars("x"), &cm).unwrap_err();
    assert_eq!(
        err,
        AlignError::InvalidCostModel {
            kind: EditKind::Ins,
            cost: -1.0,
            pos: Some((0, 1)),
        }
    );
    // No insertion is ever costed.
    assert!(build(&a, &[], &cm).is_ok());
}

#[test]
fn invalid_cost_reports_cell() {
    let cm = FnCost::classic().with_sub(|x: &char, y: &char| {
        if (*x, *y) == ('c', 'y') {
            -2.0
        } else {
            0.0
        }
    });
    let err = build(&chars("abc"), &chars("xy"), &cm).unwrap_err();
    assert_eq!(
        err,
        AlignError::InvalidCostModel {
            kind: EditKind::Sub,
            cost: -2.0,
            pos: Some((3, 2)),
        }
    );

    let cm = FnCost::classic().with_del(|_: &char| Cost::NAN);
    assert!(matches!(
        build(&chars("a"), &chars(""), &cm),
        Err(AlignError::InvalidCostModel {
            kind: EditKind::Del,
            pos: Some((1, 0)),
            ..
        })
    ));
}

#[test]
fn incomparable_elements() {
    let cm = LinearCost::classic();
    assert_eq!(
        build(&[1.0, Cost::NAN], &[1.0], &cm).unwrap_err(),
        AlignError::TypeMismatch {
            side: Side::A,
            index: 1
        }
    );
    assert_eq!(
        build(&[1.0], &[Cost::NAN], &cm).unwrap_err(),
        AlignError::TypeMismatch {
            side: Side::B,
            index: 0
        }
    );
}

#[test]
fn overflowing_sum_is_rejected() {
    // Each deletion is finite, but two of them are not.
    let cm = LinearCost::new(2.0, 1.0, 1e308);
    let a = chars("aa");
    assert_eq!(
        build(&a, &[], &cm).unwrap_err(),
        AlignError::InvalidCostModel {
            kind: EditKind::Del,
            cost: Cost::INFINITY,
            pos: Some((2, 0)),
        }
    );
    assert_eq!(min_edit_distance(&build(&a[..1], &[], &cm).unwrap()), 1e308);

    let cm = LinearCost::new(1e308, 1e308, 1e308);
    let err = build(&chars("ab"), &chars("cd"), &cm).unwrap_err();
    assert!(matches!(
        err,
        AlignError::InvalidCostModel {
            pos: Some((0, 2)),
            ..
        }
    ));
}

#[test]
fn all_ties_is_lazy() {
    // Every one of the astronomically many paths is optimal.
    let a = vec![b'A'; 30];
    let b = vec![b'C'; 30];
    let matrix = build(&a, &b, &LinearCost::linear(2.0, 1.0)).unwrap();
    let mut alignments = align(&matrix, Mode::AllTies);
    let mut distinct = FxHashSet::default();
    for alignment in alignments.by_ref().take(20_000) {
        assert_eq!(alignment.cost(), 60.0);
        assert!(distinct.insert(alignment.kinds().collect_vec()));
    }
    assert_eq!(distinct.len(), 20_000);
    assert!(alignments.next().is_some());
}

#[test]
fn count_saturates_instead_of_overflowing() {
    // Free substitutions make every path through the matrix optimal.
    let a = vec![b'A'; 100];
    let b = vec![b'C'; 100];
    let matrix = build(&a, &b, &LinearCost::linear(0.0, 0.0)).unwrap();
    assert_eq!(matrix.count_alignments(), u128::MAX);
    let best = align(&matrix, Mode::SingleBest).next().unwrap();
    assert_eq!(best.cigar(), "100X");
}

#[test]
fn shared_between_threads() {
    let a = chars("intention");
    let b = chars("execution");
    let matrix = build(&a, &b, &LinearCost::classic()).unwrap();
    let counts = std::thread::scope(|s| {
        let handles = (0..4)
            .map(|_| s.spawn(|| align(&matrix, Mode::AllTies).count()))
            .collect_vec();
        handles.into_iter().map(|h| h.join().unwrap()).collect_vec()
    });
    assert_eq!(counts, vec![134; 4]);
}

#[test]
fn facade() {
    let nw = NW::classic(Mode::AllTies);
    let (cost, alignments) = nw.align(&chars("dag"), &chars("doge")).unwrap();
    assert_eq!(cost, 3.0);
    assert_eq!(alignments.len(), 3);
    assert_eq!(alignments[0].cigar(), "1M1X1M1I");
    assert_eq!(nw.cost(&chars("llach"), &chars("llam")).unwrap(), 3.0);
}
