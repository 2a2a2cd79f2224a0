use rmcp_integrity::{
    Algorithm, HmacSha1_96, IntegrityAlgorithm, SecretBytes, SessionIntegrity,
};

/// Frame an RMCP+ session packet the way a session layer would: session
/// header, payload, integrity trailer (FFh pad to 4-byte alignment, pad
/// length, next header), then the AuthCode over everything before it.
fn frame_authenticated_packet(integrity: &SessionIntegrity, payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::new();
    packet.push(0x06); // AuthType/Format: RMCP+
    packet.push(0x40); // payload type: IPMI, authenticated
    packet.extend_from_slice(&0x0200_0000u32.to_le_bytes()); // session id
    packet.extend_from_slice(&1u32.to_le_bytes()); // session sequence
    packet.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    packet.extend_from_slice(payload);

    let base_len = 12 + payload.len() + 2;
    let pad_len = (4 - base_len % 4) % 4;
    packet.extend(std::iter::repeat_n(0xFF, pad_len));
    packet.push(pad_len as u8);
    packet.push(0x07); // next header

    let auth_code = integrity
        .generate(&packet)
        .expect("generate")
        .expect("authenticated session");
    packet.extend_from_slice(&auth_code);
    packet
}

#[test]
fn framed_packet_round_trip() {
    let sik = SecretBytes::new(vec![0x13; 20]);
    let integrity = SessionIntegrity::negotiate(Algorithm::HmacSha1_96, &sik).expect("negotiate");

    let packet = frame_authenticated_packet(&integrity, &[0x20, 0x18, 0xC8, 0x81, 0x04, 0x01]);

    // Receiver side: the AuthCode is the trailing auth_code_len bytes; the
    // authenticated range is everything before it.
    let auth_code_len = integrity.auth_code_len().expect("authenticated session");
    let data_len = packet.len() - auth_code_len;
    assert!(integrity.verify(&packet, data_len, &packet[data_len..]));

    // Corrupting the payload or the AuthCode rejects the packet.
    let mut corrupted = packet.clone();
    corrupted[14] ^= 0x01;
    assert!(!integrity.verify(&corrupted, data_len, &corrupted[data_len..]));

    let mut corrupted = packet;
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0x01;
    assert!(!integrity.verify(&corrupted, data_len, &corrupted[data_len..]));
}

#[test]
fn independent_sessions_produce_independent_auth_codes() {
    let a = SessionIntegrity::negotiate(
        Algorithm::HmacSha1_96,
        &SecretBytes::new(vec![0x01; 20]),
    )
    .expect("negotiate");
    let b = SessionIntegrity::negotiate(
        Algorithm::HmacSha1_96,
        &SecretBytes::new(vec![0x02; 20]),
    )
    .expect("negotiate");

    let packet = [0x06u8, 0x40, 0x01, 0x02, 0x03];
    let code_a = a.generate(&packet).expect("generate").expect("auth");
    let code_b = b.generate(&packet).expect("generate").expect("auth");
    assert_ne!(code_a, code_b);
    assert!(!b.verify(&packet, packet.len(), &code_a));
}

#[test]
fn shared_instance_signs_concurrently() {
    let algo = HmacSha1_96::new(&[0x77; 20]).expect("algo");
    let reference = algo.generate(b"concurrent packet").expect("generate");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let code = algo.generate(b"concurrent packet").expect("generate");
                    assert_eq!(code, reference);
                    assert!(algo.verify(b"concurrent packet", 17, &code));
                }
            });
        }
    });
}

#[test]
fn trait_object_dispatch() {
    let sha1 = HmacSha1_96::new(&[0x99; 20]).expect("algo");
    let algo: &dyn IntegrityAlgorithm = &sha1;

    let packet = [0xA5u8; 30];
    let code = algo.generate(&packet).expect("generate");
    assert_eq!(code.len(), algo.auth_code_len());
    assert!(algo.verify(&packet, packet.len(), &code));
    assert!(!algo.verify(&packet, packet.len() - 1, &code));
}

#[test]
fn short_buffers_never_panic() {
    let sik = SecretBytes::new(vec![0x44; 20]);
    let integrity = SessionIntegrity::negotiate(Algorithm::HmacSha256_128, &sik).expect("negotiate");

    assert!(!integrity.verify(&[], 1, &[0u8; 16]));
    assert!(!integrity.verify(&[0x06], 1, &[0u8; 15]));
    assert!(!integrity.verify(&[0x06], usize::MAX, &[0u8; 16]));
}
