//! In-process SMTP relay for tests
//!
//! Accepts a single plaintext session, offers `AUTH LOGIN`, plays back the
//! given challenges and records everything the client sends.

use std::{
    io::{self, BufRead, BufReader, Write},
    net::{TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// What a client sent during one session
#[derive(Debug, Default)]
pub struct Transcript {
    /// Every command line outside of the DATA phase
    pub commands: Vec<String>,

    /// The message as received during the DATA phase
    pub data: String,
}

/// A relay serving one connection on a background thread
#[derive(Debug)]
pub struct FakeRelay {
    port: u16,
    handle: JoinHandle<io::Result<Transcript>>,
}

impl FakeRelay {
    /// Starts listening on an ephemeral port.
    ///
    /// `challenges` are sent in order (base64 encoded) after `AUTH LOGIN`; the
    /// answer to the last one is accepted only if it is `password`.
    pub fn start(challenges: &[&str], password: &str) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();

        let challenges: Vec<String> = challenges.iter().map(|c| STANDARD.encode(c)).collect();
        let password = STANDARD.encode(password);

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept()?;
            serve(stream, &challenges, &password)
        });

        Ok(Self { port, handle })
    }

    /// The port the relay listens on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the session to end and returns what the client sent
    pub fn transcript(self) -> Transcript {
        self.handle
            .join()
            .expect("relay thread panicked")
            .expect("relay session failed")
    }
}

fn serve(stream: TcpStream, challenges: &[String], password: &str) -> io::Result<Transcript> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    let mut transcript = Transcript::default();

    let mut auth: Option<std::slice::Iter<'_, String>> = None;
    let mut in_data = false;
    let mut buf = String::new();

    writer.write_all(b"220 relay.test ESMTP\r\n")?;

    loop {
        buf.clear();

        if reader.read_line(&mut buf)? == 0 {
            break;
        }

        let line = buf.trim_end_matches(&['\r', '\n'][..]).to_string();

        if in_data {
            if line == "." {
                in_data = false;
                writer.write_all(b"250 2.0.0 Queued\r\n")?;
            } else {
                transcript.data.push_str(&line);
                transcript.data.push('\n');
            }

            continue;
        }

        transcript.commands.push(line.clone());

        if let Some(remaining) = auth.as_mut() {
            match remaining.next() {
                Some(challenge) => writer.write_all(format!("334 {challenge}\r\n").as_bytes())?,
                None => {
                    auth = None;

                    if line == password {
                        writer.write_all(b"235 2.7.0 Authentication successful\r\n")?;
                    } else {
                        writer.write_all(b"535 5.7.3 Authentication unsuccessful\r\n")?;
                    }
                }
            }

            continue;
        }

        let verb = line
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        match verb.as_str() {
            "EHLO" => writer.write_all(b"250-relay.test\r\n250 AUTH LOGIN\r\n")?,
            "AUTH" => {
                let mut remaining = challenges.iter();

                match remaining.next() {
                    Some(challenge) => {
                        writer.write_all(format!("334 {challenge}\r\n").as_bytes())?;
                        auth = Some(remaining);
                    }
                    None => writer.write_all(b"235 2.7.0 Authentication successful\r\n")?,
                }
            }
            "MAIL" | "RCPT" => writer.write_all(b"250 2.1.0 OK\r\n")?,
            "DATA" => {
                in_data = true;
                writer.write_all(b"354 Start mail input\r\n")?;
            }
            "QUIT" => {
                writer.write_all(b"221 2.0.0 Bye\r\n")?;
                break;
            }
            _ => writer.write_all(b"500 5.5.1 Unrecognized command\r\n")?,
        }
    }

    Ok(transcript)
}
