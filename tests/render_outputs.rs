//! Printed music flowing through the console sink into file renderers.

use cadenza::config::Config;
use cadenza::render::{piano_roll, JsonExport, SynthSettings, WavExport};
use cadenza::{run, ConsoleSink};

const PROGRAM: &str = "print 1 + 1; \
                       print Cn4/1 ++ R/1 ++ (En4/2 | Gn4/2); \
                       print true; \
                       print 12 ! Cn4/0.5";

#[test]
fn console_sink_renders_every_printed_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("out.json");
    let wav = dir.path().join("out.wav");
    let settings = SynthSettings {
        sample_rate: 8000,
        ..SynthSettings::default()
    };

    let mut sink = ConsoleSink::new(Vec::new())
        .with_renderer(Box::new(JsonExport::to_files(&json)))
        .with_renderer(Box::new(WavExport::new(&wav, settings)));
    run(PROGRAM, &mut sink, &Config::default()).unwrap();

    let stdout = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(stdout, "2\ntrue\n");

    let first: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    let notes = first.as_array().unwrap();
    assert_eq!(notes.len(), 4);
    assert_eq!(notes[1]["pitch"], -1);
    assert_eq!(notes[2]["start"], 2.0);
    assert_eq!(notes[3]["duration"], 2.0);

    let second: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("out-2.json")).unwrap())
            .unwrap();
    assert_eq!(second[0]["pitch"], 72);
    assert_eq!(second[0]["duration"], 0.5);

    for name in ["out.wav", "out-2.wav"] {
        let reader = hound::WavReader::open(dir.path().join(name)).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert!(reader.len() > 0);
    }
    assert!(!dir.path().join("out-3.wav").exists());
}

#[test]
fn piano_roll_of_a_program() {
    let values = cadenza::run_captured("print Cn4/1 ++ Dn4/1 ++ (Cn4/2 | En4/2)").unwrap();
    let music = match values.as_slice() {
        [cadenza::Value::Music(m)] => m,
        other => panic!("unexpected output {other:?}"),
    };
    let roll = piano_roll(&music.note_triples(), 1);
    assert_eq!(roll, "E4   |..#=|\nD4   |.#..|\nC4   |#.#=|\n");
}
