//! Property tests for the stabilizer tableau algebra.

use proptest::prelude::*;

use grane_ir::{Circuit, CliffordGate, Instruction, QubitId};
use grane_synth::Tableau;

const NUM_QUBITS: u32 = 3;

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    (0u8..7, 0..NUM_QUBITS, 1..NUM_QUBITS).prop_map(|(gate, qubit, offset)| match gate {
        0 => Instruction::single(CliffordGate::X, QubitId(qubit)),
        1 => Instruction::single(CliffordGate::Y, QubitId(qubit)),
        2 => Instruction::single(CliffordGate::Z, QubitId(qubit)),
        3 => Instruction::single(CliffordGate::H, QubitId(qubit)),
        4 => Instruction::single(CliffordGate::S, QubitId(qubit)),
        5 => Instruction::single(CliffordGate::Sdg, QubitId(qubit)),
        _ => Instruction::two_qubit(
            CliffordGate::Cx,
            QubitId(qubit),
            QubitId((qubit + offset) % NUM_QUBITS),
        ),
    })
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    prop::collection::vec(arb_instruction(), 0..10).prop_map(|instructions| {
        let mut circuit = Circuit::new("random", NUM_QUBITS);
        for instruction in instructions {
            circuit.append(instruction).unwrap();
        }
        circuit
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Undoing a circuit with its inverse restores the identity tableau.
    #[test]
    fn inverse_circuit_restores_identity(circuit in arb_circuit()) {
        let mut tableau = Tableau::from_circuit(&circuit);
        for instruction in circuit.inverse().iter() {
            tableau.apply(instruction);
        }
        prop_assert_eq!(tableau, Tableau::identity(NUM_QUBITS as usize));
    }

    /// Applying a gate and then its inverse leaves any tableau unchanged.
    #[test]
    fn gate_inverse_cancels(circuit in arb_circuit(), instruction in arb_instruction()) {
        let before = Tableau::from_circuit(&circuit);
        let mut after = before.clone();
        after.apply(&instruction);
        after.apply(&instruction.inverse());
        prop_assert_eq!(after, before);
    }

    /// S applied four times is the identity.
    #[test]
    fn s_gate_has_order_four(circuit in arb_circuit(), qubit in 0..NUM_QUBITS) {
        let before = Tableau::from_circuit(&circuit);
        let mut after = before.clone();
        let s = Instruction::single(CliffordGate::S, QubitId(qubit));
        for _ in 0..4 {
            after.apply(&s);
        }
        prop_assert_eq!(after, before);
    }
}
