//! Exporting a public key and encrypting to its owner

use num_bigint::BigUint;

use elgamal_ext::{ElGamalAlgorithm, ElGamalConfig, ElGamalManaged, HomomorphicOperations};

// Textbook parameters: p = 467, g = 2, x = 127
const OWNER_KEY: &str = "<ElGamalKeyValue><P>AdM=</P><G>Ag==</G><Y>hA==</Y>\
                         <Padding>BigIntegerPadding</Padding><X>fw==</X></ElGamalKeyValue>";

fn main() {
    env_logger::init();
    println!("=== Key Exchange Demo ===\n");

    // Toy modulus, far below the default minimum
    let config = ElGamalConfig {
        min_modulus_bits: 8,
        ..ElGamalConfig::default()
    };

    let owner =
        ElGamalManaged::from_xml_with_config(OWNER_KEY, config.clone()).expect("Import failed");

    let public_xml = owner.to_xml_string(false).expect("Export failed");
    println!("Published key: {}", public_xml);

    // The sender only ever sees the public half
    let sender = ElGamalManaged::from_xml_with_config(&public_xml, config).expect("Import failed");
    println!("Sender holds private key: {}", sender.has_private_key());

    let votes: Vec<_> = [3u32, 5, 7]
        .iter()
        .map(|v| {
            sender
                .encrypt(&BigUint::from(*v))
                .expect("Encryption failed")
        })
        .collect();
    let tally = sender
        .homomorphic_product(&votes)
        .expect("Product failed");

    match sender.decrypt(&tally) {
        Ok(_) => println!("unexpected: sender decrypted"),
        Err(e) => println!("Sender cannot decrypt: {}", e),
    }

    let product = owner.decrypt(&tally).expect("Decryption failed");
    println!("Owner decrypts product: {}", product);
}
