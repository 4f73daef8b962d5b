#![no_main]

use hootcb::request::HttpRequestParser;
use libfuzzer_sys::fuzz_target;

// Feeds the same bytes whole and split at every byte boundary, checking that fragmentation
// never panics and that splitting the input never changes the message's url/method/body once
// it parses successfully as a whole.
fuzz_target!(|data: &[u8]| {
    let mut whole = HttpRequestParser::new(Recorder::default());
    let whole_result = whole.feed_data(data);

    let mut fragmented = HttpRequestParser::new(Recorder::default());
    let mut fragmented_result = Ok(());
    for &byte in data {
        if let Err(e) = fragmented.feed_data(&[byte]) {
            fragmented_result = Err(e);
            break;
        }
    }

    if whole_result.is_ok() && fragmented_result.is_ok() {
        assert_eq!(whole.sink().url, fragmented.sink().url);
        assert_eq!(whole.sink().body, fragmented.sink().body);
        assert_eq!(whole.get_method(), fragmented.get_method());
    }
});

#[derive(Default)]
struct Recorder {
    url: Option<Vec<u8>>,
    body: Vec<u8>,
}

impl hootcb::sink::Sink for Recorder {
    type Error = core::convert::Infallible;

    fn on_url(&mut self, url: &[u8]) -> Result<(), Self::Error> {
        self.url = Some(url.to_vec());
        Ok(())
    }

    fn on_body(&mut self, body: &[u8]) -> Result<(), Self::Error> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}
