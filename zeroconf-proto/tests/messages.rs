use chrono::{TimeZone, Utc};
use zeroconf_proto::error::ParseError;
use zeroconf_proto::rdata::{A, TXT};
use zeroconf_proto::{Class, Name, RecordType, ResourceRecord, Response, Section};

/// A captured mDNS response: the `foo.local A` question followed by the answer
/// `foo.local A 10.0.0.5` with a TTL of 120 and the cache-flush bit.
fn foo_local_response() -> Vec<u8> {
    let mut msg = vec![
        0x00, 0x00, // id
        0x84, 0x00, // QR, AA
        0x00, 0x01, // qdcount
        0x00, 0x01, // ancount
        0x00, 0x00, // nscount
        0x00, 0x00, // arcount
    ];
    // 12: question
    msg.extend_from_slice(b"\x03foo\x05local\x00");
    msg.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    // 27: answer
    msg.extend_from_slice(b"\x03foo\x05local\x00");
    msg.extend_from_slice(&[
        0x00, 0x01, // A
        0x80, 0x01, // cache-flush, IN
        0x00, 0x00, 0x00, 0x78, // 120
        0x00, 0x04, // rdlength
        10, 0, 0, 5,
    ]);
    msg
}

/// An mDNS response announcing `foo.local A 10.0.0.5` with a TTL of 120 and the cache-flush bit.
fn foo_local_announcement() -> Vec<u8> {
    let mut msg = vec![
        0x00, 0x00, // id
        0x84, 0x00, // QR, AA
        0x00, 0x00, // qdcount
        0x00, 0x01, // ancount
        0x00, 0x00, // nscount
        0x00, 0x00, // arcount
    ];
    msg.extend_from_slice(b"\x03foo\x05local\x00");
    msg.extend_from_slice(&[
        0x00, 0x01, // A
        0x80, 0x01, // cache-flush, IN
        0x00, 0x00, 0x00, 0x78, // 120
        0x00, 0x04, // rdlength
        10, 0, 0, 5,
    ]);
    msg
}

/// A DNS-SD browse answer for `_http._tcp.local` that compresses every name it can.
fn browse_response() -> Vec<u8> {
    let mut msg = vec![
        0x00, 0x00, 0x84, 0x00, // id, flags
        0x00, 0x00, 0x00, 0x04, // qdcount, ancount
        0x00, 0x00, 0x00, 0x01, // nscount, arcount
    ];
    // 12: _http._tcp.local PTR -> Web._http._tcp.local
    msg.extend_from_slice(b"\x05_http\x04_tcp\x05local\x00");
    msg.extend_from_slice(&[0x00, 0x0c, 0x00, 0x01, 0x00, 0x00, 0x11, 0x94, 0x00, 0x06]);
    // 40: "Web" + ptr(12)
    msg.extend_from_slice(b"\x03Web\xc0\x0c");
    // 46: Web._http._tcp.local SRV 0 0 8080 host.local
    msg.extend_from_slice(&[0xc0, 0x28]);
    msg.extend_from_slice(&[0x00, 0x21, 0x80, 0x01, 0x00, 0x00, 0x00, 0x78, 0x00, 0x0d]);
    msg.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x1f, 0x90]);
    // 64: "host" + ptr(to "local" at 23)
    msg.extend_from_slice(b"\x04host\xc0\x17");
    // 71: Web._http._tcp.local TXT "path=/"
    msg.extend_from_slice(&[0xc0, 0x28]);
    msg.extend_from_slice(&[0x00, 0x10, 0x80, 0x01, 0x00, 0x00, 0x11, 0x94, 0x00, 0x07]);
    msg.extend_from_slice(b"\x06path=/");
    // 90: host.local A 192.168.1.20
    msg.extend_from_slice(&[0xc0, 0x40]);
    msg.extend_from_slice(&[0x00, 0x01, 0x80, 0x01, 0x00, 0x00, 0x00, 0x78, 0x00, 0x04]);
    msg.extend_from_slice(&[192, 168, 1, 20]);
    // 106: additional: host.local, some private type
    msg.extend_from_slice(&[0xc0, 0x40]);
    msg.extend_from_slice(&[0xff, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x78, 0x00, 0x03]);
    msg.extend_from_slice(&[1, 2, 3]);
    msg
}

#[test]
fn decode_mdns_a_announcement() {
    let msg = foo_local_announcement();
    let response = Response::parse(&msg).unwrap();

    assert!(response.is_query_response());
    assert!(response.header.flags.aa);
    assert_eq!(response.message_size, msg.len());
    assert!(response.error.is_empty());
    assert!(response.questions.is_empty());
    assert_eq!(response.answers.len(), 1);

    let answer = &response.answers[0];
    assert_eq!(answer.owner.to_string(), "foo.local");
    assert_eq!(answer.rtype(), RecordType::A);
    assert_eq!(answer.class, Class::IN);
    assert!(answer.cache_flush);
    assert_eq!(answer.section, Section::Answer);
    assert_eq!(answer.ttl(), 120);
    assert_eq!(response.records_a()[0].address, "10.0.0.5");
    assert!(response.records_ptr().is_empty());
}

#[test]
fn decode_captured_response_with_question() {
    let msg = foo_local_response();
    let response = Response::parse(&msg).unwrap();

    assert_eq!(response.message_size, 52);
    assert_eq!(response.questions.len(), 1);
    assert_eq!(response.questions[0].qname.to_string(), "foo.local");
    assert_eq!(response.questions[0].qtype, RecordType::A);
    assert_eq!(response.answers.len(), 1);
    assert_eq!(response.records_a()[0].address, "10.0.0.5");
    assert_eq!(response.answers[0].ttl(), 120);
    assert_eq!(response.answers[0].time_lived, 0);

    // nothing is compressed, so the full encoding reproduces the capture
    assert_eq!(response.encode().unwrap(), msg);
}

#[test]
fn answer_owner_pointing_into_question() {
    let mut msg = foo_local_response();
    msg.truncate(27);
    msg.extend_from_slice(&[0xc0, 0x0c]);
    msg.extend_from_slice(&[0x00, 0x01, 0x80, 0x01, 0, 0, 0, 0x78, 0, 4, 10, 0, 0, 5]);
    let response = Response::parse(&msg).unwrap();

    assert_eq!(response.answers[0].owner, response.questions[0].qname);
    assert_eq!(response.records_a()[0].address, "10.0.0.5");
    // written back uncompressed
    assert_eq!(response.encode().unwrap(), foo_local_response());
}

#[test]
fn binary_txt_and_labels_are_relayed_unchanged() {
    let mut msg = vec![
        0x00, 0x00, 0x84, 0x00, // id, flags
        0x00, 0x00, 0x00, 0x01, // qdcount, ancount
        0x00, 0x00, 0x00, 0x00, // nscount, arcount
    ];
    // a 63 octet label that is not valid UTF-8
    msg.push(63);
    msg.extend_from_slice(&[b'x'; 62]);
    msg.push(0xff);
    msg.extend_from_slice(b"\x05local\x00");
    msg.extend_from_slice(&[0x00, 0x10, 0x80, 0x01, 0x00, 0x00, 0x11, 0x94, 0x00, 0x06]);
    msg.extend_from_slice(&[0x05, b'k', b'=', 0xff, 0x00, 0xfe]);

    let response = Response::parse(&msg).unwrap();
    assert_eq!(
        response.records_txt()[0].value("k"),
        Some(&[0xff, 0x00, 0xfe][..])
    );
    assert_eq!(response.to_byte_array().unwrap(), msg);
    assert_eq!(response.encode().unwrap(), msg);
}

#[test]
fn decode_compressed_browse_response() {
    let msg = browse_response();
    let response = Response::parse(&msg).unwrap();

    let ptrs = response.records_ptr();
    assert_eq!(ptrs.len(), 1);
    assert_eq!(ptrs[0].ptrdname.to_string(), "Web._http._tcp.local");

    let srvs = response.records_srv();
    assert_eq!(srvs[0].port, 8080);
    assert_eq!(srvs[0].target, Name::new("host.local").unwrap());
    assert_eq!(response.answers[1].owner.to_string(), "Web._http._tcp.local");

    assert_eq!(response.records_txt()[0].strings, [b"path=/".to_vec()]);
    assert_eq!(response.records_a()[0].address, "192.168.1.20");
    assert_eq!(response.answers[0].ttl(), 4500);

    let additional = &response.additionals[0];
    assert_eq!(additional.section, Section::Additional);
    assert_eq!(additional.rtype(), RecordType::Unknown(0xff00));
    assert_eq!(additional.rdata().as_unknown(), Some(&[1u8, 2, 3][..]));

    let sections: Vec<_> = response.resource_records().map(|rr| rr.section).collect();
    assert_eq!(
        sections,
        [
            Section::Answer,
            Section::Answer,
            Section::Answer,
            Section::Answer,
            Section::Additional
        ]
    );
}

#[test]
fn reencoded_response_parses_to_the_same_records() {
    let response = Response::parse(&browse_response()).unwrap();
    let encoded = response.encode().unwrap();
    let reparsed = Response::parse(&encoded).unwrap();

    // names are written uncompressed, so the packet grows
    assert!(encoded.len() > browse_response().len());
    assert_eq!(reparsed.answers, response.answers);
    assert_eq!(reparsed.additionals, response.additionals);
    assert_eq!(reparsed.header, response.header);
}

#[test]
fn to_byte_array_counts_live_answers() {
    let mut response = Response::parse(&foo_local_announcement()).unwrap();
    for address in ["10.0.0.6", "10.0.0.7"] {
        response.answers.push(ResourceRecord::new(
            Name::new("foo.local").unwrap(),
            Class::IN,
            120,
            A::new(address).into(),
        ));
    }
    assert_eq!(response.header.ancount, 1);

    let bytes = response.to_byte_array().unwrap();
    assert_eq!(&bytes[6..8], [0, 3]);

    let relayed = Response::parse(&bytes).unwrap();
    let addresses: Vec<_> = relayed
        .records_a()
        .iter()
        .map(|a| a.address.as_str())
        .collect();
    assert_eq!(addresses, ["10.0.0.5", "10.0.0.6", "10.0.0.7"]);
}

#[test]
fn to_byte_array_leaves_other_sections_out() {
    let mut response = Response::parse(&browse_response()).unwrap();
    response.additionals.clear();
    response.header.arcount = 0;

    let bytes = response.to_byte_array().unwrap();
    let relayed = Response::parse(&bytes).unwrap();
    assert_eq!(relayed.answers, response.answers);

    let mut response = Response::parse(&browse_response()).unwrap();
    response.answers.clear();
    let bytes = response.to_byte_array().unwrap();

    // ARCOUNT still announces the additional record that was not written
    assert_eq!(bytes.len(), 12);
    assert!(matches!(
        Response::parse(&bytes),
        Err(ParseError::TruncatedMessage)
    ));
}

#[test]
fn aging_a_response() {
    let mut response = Response::parse(&foo_local_announcement()).unwrap();

    response.age(40);
    assert_eq!(response.answers[0].ttl(), 80);
    assert_eq!(response.answers[0].original_ttl, 120);

    response.age(500);
    assert!(response.answers[0].is_expired());
}

#[test]
fn answer_count_beyond_data_is_truncation() {
    let mut msg = foo_local_announcement();
    msg[7] = 5;

    assert!(matches!(
        Response::parse(&msg),
        Err(ParseError::TruncatedMessage)
    ));
}

#[test]
fn rdlength_beyond_data_is_truncation() {
    let mut msg = foo_local_announcement();
    msg.pop();

    assert!(matches!(
        Response::parse(&msg),
        Err(ParseError::TruncatedMessage)
    ));
}

#[test]
fn pointer_loop_in_owner_name() {
    let mut msg = foo_local_announcement();
    // replace the owner name with a pointer to itself
    msg.truncate(12);
    msg.extend_from_slice(&[0xc0, 0x0c]);
    msg.extend_from_slice(&[0x00, 0x01, 0x00, 0x01, 0, 0, 0, 0x78, 0, 4, 10, 0, 0, 5]);

    assert!(matches!(
        Response::parse(&msg),
        Err(ParseError::MalformedName(12))
    ));
}

#[test]
fn timestamp_and_trailing_bytes() {
    let mut msg = foo_local_announcement();
    msg.extend_from_slice(&[0xde, 0xad]);
    let received = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let response = Response::parse_received_at(&msg, received).unwrap();
    assert_eq!(response.timestamp, received);
    assert_eq!(response.message_size, msg.len());
    assert_eq!(response.answers.len(), 1);
}

#[test]
fn build_and_encode_response() {
    let mut response = Response::new();
    let mut record = ResourceRecord::new(
        Name::new("Kitchen._raop._tcp.local").unwrap(),
        Class::IN,
        4500,
        TXT {
            strings: vec![b"txtvers=1".to_vec(), b"ch=2".to_vec()],
        }
        .into(),
    );
    record.cache_flush = true;
    response.answers.push(record);

    let encoded = response.encode().unwrap();
    assert_eq!(&encoded[..12], [0, 0, 0x84, 0, 0, 0, 0, 1, 0, 0, 0, 0]);

    let parsed = Response::parse(&encoded).unwrap();
    assert_eq!(parsed.answers, response.answers);
    assert_eq!(parsed.records_txt()[0].value("ch"), Some(&b"2"[..]));
}

#[cfg(feature = "serde")]
#[test]
fn serialize_response() {
    let response = Response::parse(&foo_local_announcement()).unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["message_size"], 37);
    assert_eq!(json["answers"][0]["original_ttl"], 120);
    assert_eq!(json["answers"][0]["cache_flush"], true);
    assert_eq!(json["answers"][0]["rdata"]["A"]["address"], "10.0.0.5");
}
