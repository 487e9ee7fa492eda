//! Transaction tests: parsing vectors, txid, signature hashes, and
//! end-to-end signing followed by interpreter verification.

use bchkit_primitives::ec::{PrivateKey, PublicKey, Signature};
use bchkit_script::interpreter::{InterpreterError, ScriptFlags};
use bchkit_primitives::chainhash::Hash;
use bchkit_script::{template as locks, Script};

use crate::input::{OutPoint, TransactionInput, DEFAULT_SEQUENCE_NUMBER};
use crate::output::TransactionOutput;
use crate::sighash::{self, SighashType};
use crate::template::{multisig, p2pkh, sign_digest, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::verify::verify_input;
use crate::TransactionError;

/// A standard P2PKH spend with an OP_RETURN-tagged output.
const SOURCE_RAW_TX: &str = "010000000138c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006a47304402203e9ab8e4c14addf3b4741540b556cfb0e0efb67dc1a7b5ce84c3ac56b3fd447802203c9f49f7bd893ebd7060176dfc36bcaff9d2c443d9a0dd6cd2d59b372c024d20412102798913bc057b344de675dac34faafe3dc2f312c758cd9068209f810877306d66ffffffff02dc050000000000002076a914eb0bd5edba389198e73f8efabddfc61666969ff788ac6a0568656c6c6faa0d0000000000001976a914eb0bd5edba389198e73f8efabddfc61666969ff788ac00000000";

/// A coinbase transaction hex.
const COINBASE_TX_HEX: &str = "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff17033f250d2f43555656452f2c903fb60859897700d02700ffffffff01d864a012000000001976a914d648686cf603c11850f39600e37312738accca8f88ac00000000";

/// A multi-input transaction.
const MULTI_INPUT_TX_HEX: &str = "0200000003a9bc457fdc6a54d99300fb137b23714d860c350a9d19ff0f571e694a419ff3a0010000006b48304502210086c83beb2b2663e4709a583d261d75be538aedcafa7766bd983e5c8db2f8b2fc02201a88b178624ab0ad1748b37c875f885930166237c88f5af78ee4e61d337f935f412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff0092bb9a47e27bf64fc98f557c530c04d9ac25e2f2a8b600e92a0b1ae7c89c20010000006b483045022100f06b3db1c0a11af348401f9cebe10ae2659d6e766a9dcd9e3a04690ba10a160f02203f7fbd7dfcfc70863aface1a306fcc91bbadf6bc884c21a55ef0d32bd6b088c8412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff9d0d4554fa692420a0830ca614b6c60f1bf8eaaa21afca4aa8c99fb052d9f398000000006b483045022100d920f2290548e92a6235f8b2513b7f693a64a0d3fa699f81a034f4b4608ff82f0220767d7d98025aff3c7bd5f2a66aab6a824f5990392e6489aae1e1ae3472d8dffb412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff02807c814a000000001976a9143a6bf34ebfcf30e8541bbb33a7882845e5a29cb488ac76b0e60e000000001976a914bd492b67f90cb85918494767ebb23102c4f06b7088ac67000000";

const WIF: &str = "cNGwGSc7KRrTmdLUZ54fiSXWbhLNDc2Eg5zNucgQxyQCzuQ5YRDq";

fn forkid_flags() -> ScriptFlags {
    ScriptFlags::STANDARD | ScriptFlags::ENABLE_SIGHASH_FORKID
}

fn key(n: u8) -> PrivateKey {
    PrivateKey::from_bytes(&[n; 32]).unwrap()
}

/// One input spending `lock` worth `value`, one P2PKH output.
fn spending_tx(lock: Script, value: u64) -> Transaction {
    let mut tx = Transaction::new();
    tx.add_input(
        TransactionInput::new(OutPoint::new(Hash::new([0x11; 32]), 0))
            .with_source_output(TransactionOutput::new(value, lock)),
    );
    tx.add_output(TransactionOutput::new(value - 500, locks::p2pkh(&[0x22; 20]).unwrap()));
    tx
}

fn utxo(tx: &Transaction, index: usize) -> TransactionOutput {
    tx.inputs[index].source_output().unwrap().clone()
}

// -----------------------------------------------------------------------
// Transaction parsing and serialization
// -----------------------------------------------------------------------

#[test]
fn test_from_hex_roundtrip() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx hex");

    assert_eq!(tx.version, 1);
    assert_eq!(tx.input_count(), 1);
    assert_eq!(tx.output_count(), 2);
    assert_eq!(tx.lock_time, 0);
    assert_eq!(tx.to_hex(), SOURCE_RAW_TX, "hex roundtrip should produce identical output");
}

/// 3 inputs, 2 outputs, non-zero lock time.
#[test]
fn test_multi_input_roundtrip() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).expect("should parse multi-input tx");

    assert_eq!(tx.version, 2);
    assert_eq!(tx.input_count(), 3);
    assert_eq!(tx.output_count(), 2);
    assert_eq!(tx.lock_time, 103, "lock time should be 103 (0x67)");
    for input in &tx.inputs {
        assert_eq!(input.sequence_number, 0xFFFF_FFFE);
        assert!(input.unlocking_script.is_push_only());
    }
    assert_eq!(tx.to_hex(), MULTI_INPUT_TX_HEX);
}

#[test]
fn test_from_bytes_roundtrip() {
    let original_bytes = hex::decode(SOURCE_RAW_TX).unwrap();
    let tx = Transaction::from_bytes(&original_bytes).expect("should parse from bytes");
    assert_eq!(tx.to_bytes(), original_bytes);
}

#[test]
fn test_trailing_bytes_error() {
    let extended_hex = format!("{}deadbeef", SOURCE_RAW_TX);
    let result = Transaction::from_hex(&extended_hex);
    assert!(matches!(result, Err(TransactionError::SerializationError(_))));
}

#[test]
fn test_invalid_hex_error() {
    assert!(Transaction::from_hex("not_valid_hex").is_err());
}

#[test]
fn test_empty_bytes_error() {
    assert!(Transaction::from_bytes(&[]).is_err());
}

/// An input count the remaining bytes cannot hold is rejected before allocating.
#[test]
fn test_oversized_count_error() {
    let bytes = hex::decode("01000000ffffffffff00000000").unwrap();
    let err = Transaction::from_bytes(&bytes).unwrap_err();
    assert!(err.to_string().contains("input count"), "{}", err);
}

#[test]
fn test_empty_transaction_serialization() {
    let tx = Transaction::new();
    let bytes = tx.to_bytes();
    // version(4) + varint(0 inputs)(1) + varint(0 outputs)(1) + locktime(4)
    assert_eq!(bytes.len(), 10);

    let roundtrip = Transaction::from_bytes(&bytes).expect("should parse empty tx");
    assert_eq!(roundtrip, tx);
}

// -----------------------------------------------------------------------
// Transaction ID and coinbase detection
// -----------------------------------------------------------------------

#[test]
fn test_tx_id() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse tx");
    let txid = tx.tx_id();
    let txid_hex = tx.tx_id_hex();
    assert_eq!(txid_hex.len(), 64);

    let mut reversed = *txid.as_bytes();
    reversed.reverse();
    assert_eq!(hex::encode(reversed), txid_hex, "tx_id_hex should be byte-reversed tx_id");
}

/// The txid of the spent transaction is what a child input references.
#[test]
fn test_tx_id_links_child_input() {
    let parent = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let mut child = Transaction::new();
    child
        .add_input_from(&parent.tx_id_hex(), 1, parent.outputs[1].locking_script.clone(), 0)
        .unwrap();
    assert_eq!(child.inputs[0].previous_output.txid, parent.tx_id());
    assert_eq!(child.inputs[0].previous_output.index, 1);
}

#[test]
fn test_is_coinbase() {
    let tx = Transaction::from_hex(COINBASE_TX_HEX).expect("should parse coinbase tx");
    assert!(tx.is_coinbase());
    assert!(tx.inputs[0].previous_output.is_null());

    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");
    assert!(!tx.is_coinbase());
}

// -----------------------------------------------------------------------
// Building and field access
// -----------------------------------------------------------------------

#[test]
fn test_new_transaction() {
    let mut tx = Transaction::new();
    assert_eq!(tx.version, 1);
    assert_eq!(tx.lock_time, 0);
    assert_eq!(tx.input_count(), 0);
    assert_eq!(tx.output_count(), 0);

    tx.add_input(TransactionInput::new(OutPoint::new(Hash::new([0xab; 32]), 0)));
    assert_eq!(tx.input_count(), 1);
    assert_eq!(tx.inputs[0].sequence_number, DEFAULT_SEQUENCE_NUMBER);

    tx.add_output(TransactionOutput::new(50000, Script::from_bytes(&[0x76, 0xa9, 0x14])));
    assert_eq!(tx.output_count(), 1);
}

#[test]
fn test_output_fields() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");

    assert_eq!(tx.outputs[0].satoshis, 1500);
    assert_eq!(tx.outputs[1].satoshis, 3498);
    assert_eq!(tx.total_output_satoshis(), 1500 + 3498);
    assert_eq!(
        tx.outputs[1].locking_script.to_hex(),
        "76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac"
    );
    assert!(tx.outputs[1].locking_script.is_p2pkh());
    // P2PKH followed by OP_RETURN "hello"
    assert!(!tx.outputs[0].locking_script.is_standard());
}

#[test]
fn test_input_fields() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");
    let input = &tx.inputs[0];

    assert_eq!(input.sequence_number, DEFAULT_SEQUENCE_NUMBER);
    assert_eq!(input.previous_output.index, 3);
    // stored as-is from the wire, in internal byte order
    assert_eq!(
        hex::encode(input.previous_output.txid.as_bytes()),
        "38c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2"
    );
}

#[test]
fn test_total_input_satoshis() {
    let mut tx = spending_tx(Script::new(), 7000);
    assert_eq!(tx.total_input_satoshis().unwrap(), 7000);

    tx.add_input(TransactionInput::new(OutPoint::null()));
    assert!(matches!(
        tx.total_input_satoshis(),
        Err(TransactionError::MissingSourceOutput(1))
    ));
}

#[test]
fn test_transaction_size_and_display() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");
    assert_eq!(tx.size(), SOURCE_RAW_TX.len() / 2);
    assert_eq!(format!("{}", tx), SOURCE_RAW_TX);
    assert_eq!(tx.clone().to_bytes(), tx.to_bytes());
}

// -----------------------------------------------------------------------
// Sighash
// -----------------------------------------------------------------------

#[test]
fn test_calc_preimage_structure() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");
    let prev_script = hex::decode("76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac").unwrap();

    let preimage =
        sighash::calc_preimage(&tx, 0, &prev_script, SighashType::ALL_FORKID, 1500).unwrap();

    let expected_len = 4 + 32 + 32 + 36 + 1 + prev_script.len() + 8 + 4 + 32 + 4 + 4;
    assert_eq!(preimage.len(), expected_len);
    assert_eq!(&preimage[..4], &1u32.to_le_bytes());
    assert_eq!(&preimage[preimage.len() - 4..], &0x41u32.to_le_bytes());

    let digest = sighash::signature_hash(&tx, 0, &prev_script, SighashType::ALL_FORKID, 1500)
        .unwrap();
    assert_eq!(digest, bchkit_primitives::hash::sha256d(&preimage));
}

#[test]
fn test_signature_hash_out_of_range() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");
    let result = sighash::signature_hash(&tx, 99, &[], SighashType::ALL_FORKID, 0);
    assert!(matches!(
        result,
        Err(TransactionError::InputIndexOutOfRange { index: 99, count: 1 })
    ));
}

// -----------------------------------------------------------------------
// P2PKH signing
// -----------------------------------------------------------------------

/// Deterministic RFC6979 signing reproduces a known signed transaction.
#[test]
fn test_p2pkh_sign_exact_match() {
    let incomplete_tx_hex = "010000000193a35408b6068499e0d5abd799d3e827d9bfe70c9b75ebe209c91d25072326510000000000ffffffff02404b4c00000000001976a91404ff367be719efa79d76e4416ffb072cd53b208888acde94a905000000001976a91404d03f746652cfcb6cb55119ab473a045137d26588ac00000000";
    let mut tx = Transaction::from_hex(incomplete_tx_hex).expect("should parse unsigned tx");

    tx.inputs[0].set_source_output(Some(TransactionOutput::new(
        100_000_000,
        Script::from_hex("76a914c0a3c167a28cabb9fbb495affa0761e6e74ac60d88ac").unwrap(),
    )));

    let (priv_key, _) = PrivateKey::from_wif(WIF).expect("should parse WIF");
    tx.sign_input(0, &p2pkh::unlock(priv_key, None)).expect("signing should succeed");

    let expected_signed_tx = "010000000193a35408b6068499e0d5abd799d3e827d9bfe70c9b75ebe209c91d2507232651000000006b483045022100c1d77036dc6cd1f3fa1214b0688391ab7f7a16cd31ea4e5a1f7a415ef167df820220751aced6d24649fa235132f1e6969e163b9400f80043a72879237dab4a1190ad412103b8b40a84123121d260f5c109bc5a46ec819c2e4002e5ba08638783bfb4e01435ffffffff02404b4c00000000001976a91404ff367be719efa79d76e4416ffb072cd53b208888acde94a905000000001976a91404d03f746652cfcb6cb55119ab473a045137d26588ac00000000";
    assert_eq!(tx.to_hex(), expected_signed_tx);
}

#[test]
fn test_p2pkh_valid_signature() {
    let mut tx = Transaction::new();
    tx.add_input_from(
        "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d",
        0,
        Script::from_hex("76a914c7c6987b6e2345a6b138e3384141520a0fbc18c588ac").unwrap(),
        15564838601,
    )
    .expect("should add input");
    tx.add_output(TransactionOutput::new(
        375041432,
        Script::from_hex("76a91442f9682260509ac80722b1963aec8a896593d16688ac").unwrap(),
    ));
    tx.add_output(TransactionOutput::new(
        15189796941,
        Script::from_hex("76a914c36538e91213a8100dcb2aed456ade363de8483f88ac").unwrap(),
    ));

    let (priv_key, _) = PrivateKey::from_wif(WIF).expect("should parse WIF");
    let uscript = p2pkh::unlock(priv_key, None).sign(&tx, 0).expect("signing should succeed");

    let chunks = uscript.chunks().expect("should decode chunks");
    let sig_bytes = chunks[0].data().expect("sig chunk should have data");
    let pubkey_bytes = chunks[1].data().expect("pubkey chunk should have data");

    let public_key = PublicKey::from_bytes(pubkey_bytes).unwrap();
    let (hash_type, der) = sig_bytes.split_last().unwrap();
    assert_eq!(*hash_type, 0x41);
    let sig = Signature::from_der(der).unwrap();
    assert!(sig.is_low_s());

    let sig_hash = tx.calc_input_signature_hash(0, SighashType::ALL_FORKID).unwrap();
    assert!(sig.verify(&sig_hash, &public_key));
}

#[test]
fn test_p2pkh_error_without_source_output() {
    let mut tx = Transaction::new();
    tx.add_input(TransactionInput::new(OutPoint::new(Hash::new([1; 32]), 0)));
    let unlocker = p2pkh::unlock(key(1), None);

    assert!(matches!(
        unlocker.sign(&tx, 0),
        Err(TransactionError::MissingSourceOutput(0))
    ));
    assert!(matches!(
        tx.sign_input(3, &unlocker),
        Err(TransactionError::InputIndexOutOfRange { index: 3, count: 1 })
    ));
    assert_eq!(unlocker.estimate_length(&tx, 0), 106);
}

// -----------------------------------------------------------------------
// Sign then verify through the interpreter
// -----------------------------------------------------------------------

#[test]
fn test_p2pkh_fork_id_sign_and_verify() {
    let signer = key(1);
    let mut tx = spending_tx(p2pkh::lock(&signer.pub_key()).unwrap(), 10_000);
    tx.sign_input(0, &p2pkh::unlock(signer, None)).unwrap();

    assert!(verify_input(&tx, 0, &utxo(&tx, 0), forkid_flags()).unwrap());
    assert!(tx.verify(forkid_flags()).unwrap());

    // under consensus rules a tampered output just makes CHECKSIG false
    let mut tampered = tx.clone();
    tampered.outputs[0].satoshis += 1;
    let consensus = ScriptFlags::CONSENSUS | ScriptFlags::ENABLE_SIGHASH_FORKID;
    assert!(!verify_input(&tampered, 0, &utxo(&tx, 0), consensus).unwrap());

    // policy rules turn the failed non-empty signature into an error
    assert!(matches!(
        verify_input(&tampered, 0, &utxo(&tx, 0), forkid_flags()),
        Err(TransactionError::Interpreter(InterpreterError::NullFail))
    ));
}

#[test]
fn test_fork_id_signature_commits_to_value() {
    let signer = key(2);
    let mut tx = spending_tx(p2pkh::lock(&signer.pub_key()).unwrap(), 10_000);
    tx.sign_input(0, &p2pkh::unlock(signer, None)).unwrap();

    let mut wrong_value = utxo(&tx, 0);
    wrong_value.satoshis = 9_999;
    let consensus = ScriptFlags::CONSENSUS | ScriptFlags::ENABLE_SIGHASH_FORKID;
    assert!(!verify_input(&tx, 0, &wrong_value, consensus).unwrap());
}

/// Any single altered byte inside the DER signature breaks the spend.
#[test]
fn test_p2pkh_altered_signature_fails() {
    let signer = key(12);
    let mut tx = spending_tx(p2pkh::lock(&signer.pub_key()).unwrap(), 10_000);
    tx.sign_input(0, &p2pkh::unlock(signer, None)).unwrap();
    let lock = utxo(&tx, 0);
    let consensus = ScriptFlags::CONSENSUS | ScriptFlags::ENABLE_SIGHASH_FORKID;

    for offset in [10, 20, 40, 60] {
        let mut bytes = tx.inputs[0].unlocking_script.to_bytes().to_vec();
        bytes[offset] ^= 0x01;
        let mut altered = tx.clone();
        altered.inputs[0].unlocking_script = Script::from_bytes(&bytes);

        assert!(
            !verify_input(&altered, 0, &lock, consensus).unwrap(),
            "offset {}",
            offset
        );
        assert!(
            !matches!(verify_input(&altered, 0, &lock, forkid_flags()), Ok(true)),
            "offset {}",
            offset
        );
    }
}

#[test]
fn test_legacy_sign_and_verify() {
    let signer = key(3);
    let mut tx = spending_tx(p2pkh::lock(&signer.pub_key()).unwrap(), 10_000);
    tx.sign_input(0, &p2pkh::unlock(signer, Some(SighashType::ALL))).unwrap();

    assert!(verify_input(&tx, 0, &utxo(&tx, 0), ScriptFlags::STANDARD).unwrap());

    // the legacy digest does not commit to the spent value
    let mut other_value = utxo(&tx, 0);
    other_value.satoshis = 1;
    assert!(verify_input(&tx, 0, &other_value, ScriptFlags::STANDARD).unwrap());

    // a fork-id chain refuses signatures without the fork-id bit
    assert!(matches!(
        verify_input(&tx, 0, &utxo(&tx, 0), forkid_flags()),
        Err(TransactionError::Interpreter(InterpreterError::MustUseForkId))
    ));
}

#[test]
fn test_fork_id_signature_rejected_without_fork_id_flag() {
    let signer = key(4);
    let mut tx = spending_tx(p2pkh::lock(&signer.pub_key()).unwrap(), 10_000);
    tx.sign_input(0, &p2pkh::unlock(signer, None)).unwrap();

    assert!(matches!(
        verify_input(&tx, 0, &utxo(&tx, 0), ScriptFlags::STANDARD),
        Err(TransactionError::Interpreter(InterpreterError::IllegalForkId))
    ));
}

/// Signing one input with ANYONECANPAY leaves room for others to join later.
#[test]
fn test_anyone_can_pay_survives_added_input() {
    let signer = key(5);
    let mut tx = spending_tx(p2pkh::lock(&signer.pub_key()).unwrap(), 10_000);
    let hash_type = SighashType::ALL_FORKID | SighashType::ANYONECANPAY;
    tx.sign_input(0, &p2pkh::unlock(signer, Some(hash_type))).unwrap();
    let lock = utxo(&tx, 0);

    tx.add_input(TransactionInput::new(OutPoint::new(Hash::new([0x33; 32]), 7)));
    assert!(verify_input(&tx, 0, &lock, forkid_flags()).unwrap());
}

/// Legacy SINGLE without a matching output signs the digest one.
#[test]
fn test_legacy_single_without_matching_output() {
    let signer = key(6);
    let lock = p2pkh::lock(&signer.pub_key()).unwrap();
    let mut tx = spending_tx(lock.clone(), 10_000);
    tx.add_input(
        TransactionInput::new(OutPoint::new(Hash::new([0x44; 32]), 1))
            .with_source_output(TransactionOutput::new(2_000, lock)),
    );
    assert_eq!(tx.output_count(), 1);

    tx.sign_input(1, &p2pkh::unlock(signer, Some(SighashType::SINGLE))).unwrap();
    assert!(verify_input(&tx, 1, &utxo(&tx, 1), ScriptFlags::STANDARD).unwrap());

    // the signature keeps verifying whatever the outputs become
    tx.outputs[0].satoshis = 1;
    assert!(verify_input(&tx, 1, &utxo(&tx, 1), ScriptFlags::STANDARD).unwrap());
}

#[test]
fn test_bare_multisig_two_of_three() {
    let keys = [key(7), key(8), key(9)];
    let pubs: Vec<PublicKey> = keys.iter().map(|k| k.pub_key()).collect();
    let lock = locks::multisig(2, &pubs).unwrap();
    let tx = spending_tx(lock, 50_000);

    let mut signed = tx.clone();
    signed
        .sign_input(0, &multisig::unlock(vec![keys[0].clone(), keys[2].clone()], None))
        .unwrap();
    // leading OP_0 for the extra item CHECKMULTISIG pops
    assert_eq!(signed.inputs[0].unlocking_script.to_bytes()[0], 0x00);
    assert!(verify_input(&signed, 0, &utxo(&signed, 0), forkid_flags()).unwrap());

    // signatures out of key order exhaust the keys
    let mut swapped = tx.clone();
    swapped
        .sign_input(0, &multisig::unlock(vec![keys[2].clone(), keys[0].clone()], None))
        .unwrap();
    let consensus = ScriptFlags::CONSENSUS | ScriptFlags::ENABLE_SIGHASH_FORKID;
    assert!(!verify_input(&swapped, 0, &utxo(&swapped, 0), consensus).unwrap());

    // one key short of the threshold
    assert!(matches!(
        multisig::unlock(vec![keys[1].clone()], None).sign(&tx, 0),
        Err(TransactionError::SigningError(_))
    ));
}

/// A 2-of-3 lock spent with a single valid signature does not verify.
#[test]
fn test_multisig_below_threshold_fails_verification() {
    let keys = [key(13), key(14), key(15)];
    let pubs: Vec<PublicKey> = keys.iter().map(|k| k.pub_key()).collect();
    let lock = locks::multisig(2, &pubs).unwrap();
    let mut tx = spending_tx(lock.clone(), 50_000);

    let digest =
        sighash::signature_hash(&tx, 0, lock.to_bytes(), SighashType::ALL_FORKID, 50_000).unwrap();
    let sigs: Vec<Vec<u8>> = keys
        .iter()
        .map(|k| sign_digest(k, &digest, SighashType::ALL_FORKID).unwrap())
        .collect();

    tx.inputs[0].unlocking_script = multisig::unlocking_script(&sigs[..2]).unwrap();
    assert!(verify_input(&tx, 0, &utxo(&tx, 0), forkid_flags()).unwrap());

    tx.inputs[0].unlocking_script = multisig::unlocking_script(&sigs[1..2]).unwrap();
    let consensus = ScriptFlags::CONSENSUS | ScriptFlags::ENABLE_SIGHASH_FORKID;
    for flags in [consensus, forkid_flags()] {
        assert!(!matches!(verify_input(&tx, 0, &utxo(&tx, 0), flags), Ok(true)));
    }
}

#[test]
fn test_p2sh_multisig_sign_and_verify() {
    let keys = [key(10), key(11)];
    let pubs: Vec<PublicKey> = keys.iter().map(|k| k.pub_key()).collect();
    let redeem = locks::multisig(2, &pubs).unwrap();
    let mut tx = spending_tx(locks::p2sh(&redeem), 50_000);

    let unlocker = multisig::unlock_p2sh(keys.to_vec(), redeem.clone(), None);
    tx.sign_input(0, &unlocker).unwrap();

    let unlock = &tx.inputs[0].unlocking_script;
    assert!(unlock.is_push_only());
    assert_eq!(unlock.pushed_data_at(-1).unwrap(), Some(redeem.to_bytes()));
    assert!(unlocker.estimate_length(&tx, 0) >= unlock.len());
    assert!(verify_input(&tx, 0, &utxo(&tx, 0), forkid_flags()).unwrap());

    // a redeem script that hashes elsewhere is refused before signing
    let other = locks::multisig(1, &pubs).unwrap();
    assert!(matches!(
        multisig::unlock_p2sh(keys.to_vec(), other, None).sign(&tx, 0),
        Err(TransactionError::SigningError(_))
    ));
}

#[test]
fn test_multisig_unlocking_script_from_signatures() {
    let script = multisig::unlocking_script(&[vec![0x30, 0x01], vec![0x30, 0x02]]).unwrap();
    assert_eq!(script.to_hex(), "00023001023002");
    assert!(multisig::unlocking_script(&[]).is_err());
}

#[test]
fn test_verify_input_out_of_range() {
    let tx = spending_tx(Script::from_bytes(&[0x51]), 1_000);
    let output = utxo(&tx, 0);
    assert!(matches!(
        verify_input(&tx, 1, &output, ScriptFlags::STANDARD),
        Err(TransactionError::InputIndexOutOfRange { index: 1, count: 1 })
    ));
}

/// Lock-time opcodes read the transaction through the checker.
#[test]
fn test_check_lock_time_reads_transaction() {
    let mut lock = Script::new();
    lock.append_number(500)
        .unwrap()
        .append_opcode(bchkit_script::Opcode::CheckLockTimeVerify)
        .unwrap();
    let mut tx = spending_tx(lock, 1_000);
    tx.inputs[0].sequence_number = 0;

    tx.lock_time = 499;
    assert!(matches!(
        verify_input(&tx, 0, &utxo(&tx, 0), ScriptFlags::CONSENSUS),
        Err(TransactionError::Interpreter(InterpreterError::UnsatisfiedLockTime))
    ));

    tx.lock_time = 500;
    assert!(verify_input(&tx, 0, &utxo(&tx, 0), ScriptFlags::CONSENSUS).unwrap());
}
