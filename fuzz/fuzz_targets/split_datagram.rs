#![no_main]

use hldslog_parser::collector::split_datagram;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 빈 라인이나 앞뒤 공백이 남지 않아야 한다
    for line in split_datagram(data) {
        assert!(!line.is_empty());
        assert_eq!(line.trim_matches(|c: char| c.is_whitespace() || c == '\0'), line);
    }
});
