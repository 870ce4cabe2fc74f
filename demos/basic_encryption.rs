//! Basic ElGamal encryption, signing and homomorphic multiplication

use num_bigint::BigUint;
use zeroize::Zeroizing;

use elgamal_ext::{ElGamalAlgorithm, ElGamalManaged, ElGamalParameters, PaddingMode};

// RFC 2409 Oakley group 2 (1024-bit safe prime), generator 2
const P_HEX: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7EDEE386BFB5A899FA5AE9F24117C4B1FE649286651ECE65381FFFFFFFFFFFFFFFF";
const X_HEX: &str = "A170B33839263059F28C105D1FB17C2390C192CFD3AC94AF0F21DDB66CAD4A268D116ECE1738F7D93D9C172411E20B8F6B0D549B6F03675A1600A35A099950D836F675CC81E74EF5E8E25D940ED904759531985D5D9DC9F81818E811892F902BD23F0824128B2F330C5C7FD0A6A3A4506513270E269E0D37F2A74DE452E6B439";

fn main() {
    env_logger::init();
    println!("=== Basic ElGamal Demo ===\n");

    // Derive y = g^x mod p for a fixed exponent
    let p = BigUint::parse_bytes(P_HEX.as_bytes(), 16).expect("valid hex");
    let x = BigUint::parse_bytes(X_HEX.as_bytes(), 16).expect("valid hex");
    let g = BigUint::from(2u32);
    let y = g.modpow(&x, &p);

    let parameters = ElGamalParameters {
        p: p.to_bytes_be(),
        g: g.to_bytes_be(),
        y: y.to_bytes_be(),
        x: Zeroizing::new(x.to_bytes_be()),
        padding: PaddingMode::AnsiX923,
    };
    let elgamal = ElGamalManaged::from_parameters(&parameters).expect("Failed to import key");
    println!("✓ Imported {}-bit key", elgamal.key_size());

    // Multiplicative homomorphism
    println!("\n--- Homomorphic Multiplication ---");
    let value1 = BigUint::from(15u32);
    let value2 = BigUint::from(7u32);

    let ct1 = elgamal
        .encrypt_big_integer(&value1)
        .expect("Encryption failed");
    let ct2 = elgamal
        .encrypt_big_integer(&value2)
        .expect("Encryption failed");
    println!("Ciphertext sizes: {} bytes each", ct1.len());

    let ct_product = elgamal.multiply(&ct1, &ct2).expect("Multiplication failed");
    let product = elgamal
        .decrypt_big_integer(&ct_product)
        .expect("Decryption failed");
    println!("{} × {} = {}", value1, value2, product);

    // Padded byte messages
    println!("\n--- Padded Messages ---");
    let message = b"Hello, ElGamal!";
    for mode in PaddingMode::ALL {
        let mut engine = elgamal.clone();
        engine.set_padding(mode);

        let ciphertext = engine.encrypt_data(message).expect("Encryption failed");
        let recovered = engine.decrypt_data(&ciphertext).expect("Decryption failed");
        println!(
            "{:>18}: {}",
            mode.to_string(),
            String::from_utf8_lossy(&recovered)
        );
    }

    // Signatures
    println!("\n--- Signatures ---");
    let signature = elgamal.sign_data(message).expect("Signing failed");
    println!(
        "Signature valid: {}",
        elgamal
            .verify_data(message, &signature)
            .expect("Verification failed")
    );
    println!(
        "Signature valid for tampered message: {}",
        elgamal
            .verify_data(b"Hello, RSA!", &signature)
            .expect("Verification failed")
    );
}
