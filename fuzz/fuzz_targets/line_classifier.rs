#![no_main]

use hldslog_parser::classifier::{Classification, LineClassifier};
use hldslog_parser::i18n::Translations;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(translations) = Translations::builtin("en") else {
        return;
    };
    let Ok(classifier) = LineClassifier::new(translations) else {
        return;
    };
    let line = String::from_utf8_lossy(data);

    // 패닉 없이 분류되어야 하고, 매칭 결과는 종류별 필드 집합 안에 있어야 한다
    if let Classification::Matched(event) = classifier.classify(&line) {
        assert!(event.has_valid_fields());
    }
});
