//! End-to-end synthesis tests: small hand-picked targets, consistency
//! checks, and differential satisfiability with and without symmetry
//! breaking.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use grane_ir::{Circuit, CliffordGate, QubitId};
use grane_synth::{synthesize, Config, Outcome, SynthError, Tableau, TargetMetric};

fn config(target: TargetMetric, symmetry_breaking: bool) -> Config {
    Config {
        target,
        symmetry_breaking,
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// The extracted circuit must map the initial tableau to the target.
fn assert_realizes(initial: &Tableau, target: &Tableau, circuit: &Circuit) {
    let mut tableau = initial.clone();
    for instruction in circuit {
        tableau.apply(instruction);
    }
    assert_eq!(&tableau, target, "extracted circuit misses the target");
}

#[test]
fn single_qubit_bit_flip() {
    let initial = Tableau::identity(1);
    let target: Tableau = "[-Z]".parse().unwrap();

    match synthesize(&initial, &target, 1, &Config::default()).unwrap() {
        Outcome::Realizable(results) => {
            assert_eq!(results.gates(), 1);
            assert_eq!(results.two_qubit_gates, 0);
            assert_eq!(results.depth, 1);
            assert_realizes(&initial, &target, &results.circuit);
        }
        Outcome::Unrealizable => panic!("bit flip should be realizable at depth 1"),
    }

    // no zero-timestep circuit flips the sign
    assert_eq!(
        synthesize(&initial, &target, 0, &Config::default()).unwrap(),
        Outcome::Unrealizable
    );
}

#[test]
fn single_entangling_gate() {
    let initial = Tableau::identity(2);
    let mut circuit = Circuit::new("cx", 2);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let target = Tableau::from_circuit(&circuit);

    match synthesize(&initial, &target, 1, &Config::default()).unwrap() {
        Outcome::Realizable(results) => {
            assert_eq!(results.gates(), 1);
            assert_eq!(results.two_qubit_gates, 1);
            let instruction = results.circuit.iter().next().unwrap();
            assert_eq!(instruction.gate, CliffordGate::Cx);
            assert_eq!(instruction.control(), Some(QubitId(0)));
            assert_eq!(instruction.target(), QubitId(1));
            assert_realizes(&initial, &target, &results.circuit);
        }
        Outcome::Unrealizable => panic!("one CX should be realizable at depth 1"),
    }
}

#[test]
fn zero_timesteps() {
    let initial = Tableau::identity(2);

    match synthesize(&initial, &initial, 0, &Config::default()).unwrap() {
        Outcome::Realizable(results) => {
            assert!(results.circuit.is_empty());
            assert_eq!(results.gates(), 0);
            assert_eq!(results.depth, 0);
        }
        Outcome::Unrealizable => panic!("identity target should be realizable at depth 0"),
    }

    let flipped: Tableau = "[-ZI, IZ]".parse().unwrap();
    assert_eq!(
        synthesize(&initial, &flipped, 0, &Config::default()).unwrap(),
        Outcome::Unrealizable
    );
}

#[test]
fn bell_tableau_needs_two_timesteps() {
    let initial = Tableau::identity(2);
    let target: Tableau = "[XX, ZZ]".parse().unwrap();

    for symmetry_breaking in [false, true] {
        let cfg = config(TargetMetric::Depth, symmetry_breaking);
        assert_eq!(
            synthesize(&initial, &target, 1, &cfg).unwrap(),
            Outcome::Unrealizable,
            "H and CX on the same qubit cannot share a timestep"
        );
        match synthesize(&initial, &target, 2, &cfg).unwrap() {
            Outcome::Realizable(results) => {
                assert!(results.depth <= 2);
                assert_realizes(&initial, &target, &results.circuit);
            }
            Outcome::Unrealizable => panic!("bell tableau should be realizable at depth 2"),
        }
    }
}

#[test]
fn gate_count_metric_runs_one_gate_per_timestep() {
    let initial = Tableau::identity(2);
    let target: Tableau = "[XX, ZZ]".parse().unwrap();

    // one gate per timestep: H then CX is the only two-gate realization
    match synthesize(&initial, &target, 2, &config(TargetMetric::GateCount, true)).unwrap() {
        Outcome::Realizable(results) => {
            assert_eq!(results.gates(), 2);
            assert_eq!(results.two_qubit_gates, 1);
            assert_realizes(&initial, &target, &results.circuit);
        }
        Outcome::Unrealizable => panic!("bell tableau should be realizable in two gates"),
    }
}

#[test]
fn non_identity_initial_tableau() {
    let mut prefix = Circuit::new("prefix", 2);
    prefix.h(QubitId(0)).unwrap();
    prefix.s(QubitId(1)).unwrap();
    let initial = Tableau::from_circuit(&prefix);

    let mut full = prefix.clone();
    full.cx(QubitId(0), QubitId(1)).unwrap();
    let target = Tableau::from_circuit(&full);

    match synthesize(&initial, &target, 1, &Config::default()).unwrap() {
        Outcome::Realizable(results) => {
            assert_realizes(&initial, &target, &results.circuit);
        }
        Outcome::Unrealizable => panic!("suffix should be realizable at depth 1"),
    }
}

#[test]
fn mismatched_qubit_counts_error() {
    let initial = Tableau::identity(2);
    let target = Tableau::identity(3);
    assert!(matches!(
        synthesize(&initial, &target, 1, &Config::default()),
        Err(SynthError::QubitCountMismatch {
            expected: 2,
            got: 3
        })
    ));
}

fn random_circuit(rng: &mut StdRng, num_qubits: u32, gates: usize) -> Circuit {
    let mut circuit = Circuit::new("random", num_qubits);
    for _ in 0..gates {
        let qubit = QubitId(rng.gen_range(0..num_qubits));
        match rng.gen_range(0..7u8) {
            0 => circuit.x(qubit).unwrap(),
            1 => circuit.y(qubit).unwrap(),
            2 => circuit.z(qubit).unwrap(),
            3 => circuit.h(qubit).unwrap(),
            4 => circuit.s(qubit).unwrap(),
            5 => circuit.sdg(qubit).unwrap(),
            _ => {
                let other = QubitId((qubit.0 + rng.gen_range(1..num_qubits)) % num_qubits);
                circuit.cx(qubit, other).unwrap()
            }
        };
    }
    circuit
}

/// Symmetry breaking must never turn a satisfiable instance into an
/// unsatisfiable one. Random targets are realizable at T = gate count by
/// construction (one gate per layer), so every run here must stay
/// realizable with the cuts enabled, under both strategy variants.
#[test]
fn differential_satisfiability_on_random_instances() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(0x6772616e);
    for round in 0..10 {
        let num_qubits = rng.gen_range(2..=3);
        let gates = rng.gen_range(1..=3);
        let circuit = random_circuit(&mut rng, num_qubits, gates);
        let initial = Tableau::identity(num_qubits as usize);
        let target = Tableau::from_circuit(&circuit);

        for metric in [TargetMetric::Depth, TargetMetric::GateCount] {
            for symmetry_breaking in [false, true] {
                let cfg = config(metric, symmetry_breaking);
                match synthesize(&initial, &target, gates, &cfg).unwrap() {
                    Outcome::Realizable(results) => {
                        assert_realizes(&initial, &target, &results.circuit);
                        if metric == TargetMetric::GateCount {
                            assert!(results.gates() <= gates);
                        }
                    }
                    Outcome::Unrealizable => panic!(
                        "round {round}: instance unrealizable ({metric:?}, \
                         symmetry_breaking = {symmetry_breaking})"
                    ),
                }
            }
        }
    }
}

/// Unsatisfiable instances stay unsatisfiable under the cuts (the cuts
/// only ever remove solutions).
#[test]
fn symmetry_breaking_preserves_unsatisfiability() {
    let initial = Tableau::identity(2);
    let target: Tableau = "[XX, ZZ]".parse().unwrap();
    for metric in [TargetMetric::Depth, TargetMetric::GateCount] {
        for symmetry_breaking in [false, true] {
            assert_eq!(
                synthesize(&initial, &target, 1, &config(metric, symmetry_breaking)).unwrap(),
                Outcome::Unrealizable
            );
        }
    }
}
